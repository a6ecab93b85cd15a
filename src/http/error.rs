use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::core::ai::AiError;
use crate::core::storage::StorageError;
use crate::core::story::StoryError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::Ai(e) => ApiError::Ai(e),
            StoryError::Storage(e) => ApiError::Storage(e),
            StoryError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None),

            Self::Ai(AiError::UnknownModel(_)) => (StatusCode::BAD_REQUEST, "UNKNOWN_MODEL", None),
            Self::Ai(AiError::NotConfigured) => {
                (StatusCode::SERVICE_UNAVAILABLE, "AI_NOT_CONFIGURED", None)
            }
            Self::Ai(e) => {
                tracing::error!(error = %e, "AI provider error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", Some(e.to_string()))
            }

            Self::Storage(StorageError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", None)
            }
            Self::Storage(StorageError::AlreadyExists { .. }) => {
                (StatusCode::CONFLICT, "ALREADY_EXISTS", None)
            }
            Self::Storage(StorageError::InvalidName(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", None)
            }
            Self::Storage(StorageError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", None)
            }
            // Credentials that load but are rejected later (revoked refresh token).
            Self::Storage(StorageError::Auth(e)) => {
                tracing::warn!(error = %e, "Storage credentials rejected");
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", None)
            }
            Self::Storage(e) => {
                tracing::error!(error = %e, "Storage backend error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", Some(e.to_string()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = self.parts();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
