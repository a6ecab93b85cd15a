// Runtime configuration, read once at startup from the environment
// (after `.env` has been loaded).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::core::ai::WritingModel;
use crate::infra::ai::DEFAULT_BASE_URL as OPENAI_DEFAULT_BASE_URL;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DRIVE_ROOT_FOLDER_ID: &str = "1UNIpr8fEWbGccnyAAu01kwXa6xwPdkFk";

const API_KEY_FILE: &str = "openai api key.txt";
const TOKEN_FILE: &str = "token.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Drive,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(StorageBackend::Drive),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("expected 'drive' or 'memory', got '{}'", other)),
        }
    }
}

/// One place Google credentials may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    AuthorizedUserJson(String),
    AuthorizedUserFile(PathBuf),
    ServiceAccountJson(String),
    ServiceAccountFile(PathBuf),
}

impl CredentialSource {
    pub fn describe(&self) -> &'static str {
        match self {
            CredentialSource::AuthorizedUserJson(_) => "GOOGLE_OAUTH_TOKEN_JSON",
            CredentialSource::AuthorizedUserFile(_) => "token.json",
            CredentialSource::ServiceAccountJson(_) => "GOOGLE_SERVICE_ACCOUNT_JSON",
            CredentialSource::ServiceAccountFile(_) => "GOOGLE_SERVICE_ACCOUNT_KEY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub default_model: WritingModel,
    pub ai_max_concurrency: usize,
    pub drive_root_folder_id: String,
    pub storage_backend: StorageBackend,
    /// Every configured credential, in the order they should be tried.
    pub credentials: Vec<CredentialSource>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), Path::new("."))
    }

    /// `base_dir` is where the key and token fallback files are looked up.
    pub fn from_lookup<F>(lookup: F, base_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let default_model = match get("DEFAULT_WRITING_MODEL") {
            Some(raw) => raw.parse::<WritingModel>().map_err(|e| ConfigError::Invalid {
                var: "DEFAULT_WRITING_MODEL",
                message: e.to_string(),
            })?,
            None => WritingModel::default(),
        };

        let ai_max_concurrency = match get("AI_MAX_CONCURRENCY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "AI_MAX_CONCURRENCY",
                        message: format!("expected a positive integer, got '{}'", raw),
                    })
                }
            },
            None => 1,
        };

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                var: "STORAGE_BACKEND",
                message,
            })?,
            None => StorageBackend::Drive,
        };

        let openai_api_key = get("OPENAI_API_KEY").or_else(|| {
            std::fs::read_to_string(base_dir.join(API_KEY_FILE))
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        });

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string()),
            default_model,
            ai_max_concurrency,
            drive_root_folder_id: get("DRIVE_ROOT_FOLDER_ID")
                .unwrap_or_else(|| DEFAULT_DRIVE_ROOT_FOLDER_ID.to_string()),
            storage_backend,
            credentials: credential_sources(&get, base_dir),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Environment token first, then `token.json`, then service accounts.
/// A source that fails to load falls through to the next one at startup.
fn credential_sources<G>(get: &G, base_dir: &Path) -> Vec<CredentialSource>
where
    G: Fn(&str) -> Option<String>,
{
    let mut sources = Vec::new();

    if let Some(json) = get("GOOGLE_OAUTH_TOKEN_JSON") {
        sources.push(CredentialSource::AuthorizedUserJson(json));
    }

    let token_file = base_dir.join(TOKEN_FILE);
    if token_file.is_file() {
        sources.push(CredentialSource::AuthorizedUserFile(token_file));
    }

    if let Some(json) = get("GOOGLE_SERVICE_ACCOUNT_JSON") {
        sources.push(CredentialSource::ServiceAccountJson(json));
    }

    if let Some(path) = get("GOOGLE_SERVICE_ACCOUNT_KEY") {
        sources.push(CredentialSource::ServiceAccountFile(PathBuf::from(path)));
    }

    sources
}
