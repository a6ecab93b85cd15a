// This is the entry point of the Isabella story backend.
//
// **Architecture Overview:**
// - `core/` = Business logic (summarizer, AI service, story workflow, file rules)
// - `infra/` = Implementations of core traits (OpenAI, Google Drive, in-memory store)
// - `http/` = axum adapters (routes, handlers, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve the router until shutdown

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StorageBackend};
use crate::core::ai::{AiConfig, AiService};
use crate::core::storage::{FileStoreHandle, ProjectFileService};
use crate::core::story::WRITER_PERSONA;
use crate::http::{create_router, AppState, DynProvider};
use crate::infra::ai::OpenAiClient;
use crate::infra::google_drive::{first_token_source, GoogleDriveClient};
use crate::infra::storage::InMemoryFileStore;

/// Builds the provider, or `None` when no key is configured.
fn build_provider(config: &Config) -> anyhow::Result<Option<DynProvider>> {
    let Some(api_key) = config.openai_api_key.clone() else {
        tracing::warn!("OPENAI_API_KEY not set; story generation and chat are disabled");
        return Ok(None);
    };

    let client = OpenAiClient::new(api_key, config.openai_base_url.clone())
        .context("Failed to create OpenAI client")?;
    tracing::info!(base_url = %config.openai_base_url, "OpenAI client configured");
    let provider: DynProvider = Box::new(client);
    Ok(Some(provider))
}

/// Storage problems never stop the server; they leave the handle unavailable.
async fn build_file_store(config: &Config) -> FileStoreHandle {
    if config.storage_backend == StorageBackend::Memory {
        tracing::info!("Using in-memory file store");
        return FileStoreHandle::Available(Arc::new(InMemoryFileStore::new()));
    }

    if config.credentials.is_empty() {
        tracing::warn!("No Google credentials found; Google Drive will not be available");
        return FileStoreHandle::unavailable("no Google credentials configured");
    }

    match first_token_source(&config.credentials).await {
        Ok((auth, source)) => {
            tracing::info!(source = source.describe(), "Google Drive configured");
            let client = GoogleDriveClient::new(auth, config.drive_root_folder_id.clone());
            FileStoreHandle::Available(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Google Drive will not be available");
            FileStoreHandle::unavailable(e.to_string())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let provider = build_provider(&config)?;
    let ai = AiService::new(
        provider,
        WRITER_PERSONA.to_string(),
        AiConfig::default(),
        config.ai_max_concurrency,
    );

    let files = ProjectFileService::new(build_file_store(&config).await);

    let state = Arc::new(AppState::new(ai, files, config.default_model));
    let router = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "Isabella backend listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
