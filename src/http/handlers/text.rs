use std::sync::Arc;

use axum::{extract::State, Json};

use crate::http::dto::{ChatRequest, ChatResponse, SummarizeRequest, SummarizeResponse};
use crate::http::error::{ApiError, ApiResult};
use crate::http::state::AppState;

/// POST /summarize
///
/// Extractive unless a model is named; a failing model call also ends up
/// extractive, and `method` reports which path produced the summary.
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummarizeRequest>,
) -> ApiResult<Json<SummarizeResponse>> {
    if body.max_length == 0 {
        return Err(ApiError::Validation(
            "max_length must be at least 1".to_string(),
        ));
    }

    // Only an explicit model key goes to the provider.
    let model = match body.model.as_deref() {
        Some(key) => Some(state.resolve_model(Some(key))?),
        None => None,
    };

    let outcome = state.ai.summarize(&body.text, body.max_length, model).await;

    Ok(Json(SummarizeResponse {
        original_length: body.text.chars().count(),
        summary_length: outcome.summary.chars().count(),
        summary: outcome.summary,
        method: outcome.method,
    }))
}

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if body.messages.is_empty() {
        return Err(ApiError::Validation(
            "messages must not be empty".to_string(),
        ));
    }

    let model = state.resolve_model(body.model.as_deref())?;
    let content = state
        .ai
        .chat(body.messages, model, body.max_tokens, body.temperature)
        .await?;

    Ok(Json(ChatResponse {
        content,
        model: model.key().to_string(),
    }))
}
