// Banner, health and status endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::core::ai::WritingModel;
use crate::http::state::{AppState, SERVICE_NAME, SERVICE_VERSION};

/// GET /
pub async fn root() -> Json<Value> {
    let models: Vec<&str> = WritingModel::ALL.iter().map(|m| m.key()).collect();

    Json(json!({
        "service": "Isabella - Master Storyteller GPT",
        "version": SERVICE_VERSION,
        "status": "online",
        "endpoints": {
            "POST /story/create": "Generate a new story from prompt",
            "POST /story/continue": "Continue an existing story",
            "POST /story/revise": "Revise a specific chapter",
            "GET /story/models": "List available writing models",
            "GET /story/status": "System status",
            "POST /summarize": "Summarize text",
            "POST /chat": "Raw chat completion",
            "GET /projects": "List project folders",
            "GET /projects/{project}/files": "List files in a project",
        },
        "google_drive_integration": "Automatic story saving enabled",
        "openai_models": models,
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /story/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let drive = if state.files.is_available() {
        "connected"
    } else {
        "disconnected"
    };
    let openai = if state.ai.is_configured() {
        "configured"
    } else {
        "missing"
    };

    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "status": "online",
        "google_drive": drive,
        "openai": openai,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /story/models
pub async fn models(State(state): State<Arc<AppState>>) -> Json<Value> {
    let models: Vec<Value> = WritingModel::ALL
        .iter()
        .map(|m| {
            json!({
                "key": m.key(),
                "provider_model": m.provider_id(),
                "description": m.description(),
            })
        })
        .collect();

    Json(json!({
        "default": state.default_model.key(),
        "models": models,
    }))
}
