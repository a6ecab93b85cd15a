use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Metadata for one file inside a project folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub project: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File '{title}' not found in project '{project}'")]
    NotFound { project: String, title: String },

    #[error("File '{title}' already exists in project '{project}'")]
    AlreadyExists { project: String, title: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("File storage unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Storage API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Storage request failed: {0}")]
    Http(String),

    #[error("Invalid storage response: {0}")]
    InvalidResponse(String),
}

impl StorageError {
    pub fn not_found(project: &str, title: &str) -> Self {
        StorageError::NotFound {
            project: project.to_string(),
            title: title.to_string(),
        }
    }

    pub fn already_exists(project: &str, title: &str) -> Self {
        StorageError::AlreadyExists {
            project: project.to_string(),
            title: title.to_string(),
        }
    }
}
