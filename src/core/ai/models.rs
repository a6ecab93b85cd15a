use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

impl AiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation defaults applied when a caller does not override them.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            max_tokens: Some(8000),
            top_p: Some(0.95),
        }
    }
}

/// Body of an OpenAI-compatible `/chat/completions` call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<AiMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider is not configured (OPENAI_API_KEY missing)")]
    NotConfigured,

    #[error("Unknown writing model '{0}'")]
    UnknownModel(String),

    #[error("AI provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("AI provider request failed: {0}")]
    Http(String),

    #[error("Invalid AI provider response: {0}")]
    InvalidResponse(String),

    #[error("AI worker pool is closed")]
    PoolClosed,
}

/// The writing models callers may ask for, keyed by their public name.
///
/// Parsing is strict: an unknown key is an error rather than a silent
/// fallback to the default model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritingModel {
    Gpt4o,
    Gpt4Turbo,
    Gpt35Turbo,
}

impl WritingModel {
    pub const ALL: [WritingModel; 3] = [
        WritingModel::Gpt4o,
        WritingModel::Gpt4Turbo,
        WritingModel::Gpt35Turbo,
    ];

    /// Name used in requests and responses.
    pub fn key(&self) -> &'static str {
        match self {
            WritingModel::Gpt4o => "gpt-4o",
            WritingModel::Gpt4Turbo => "gpt-4-turbo",
            WritingModel::Gpt35Turbo => "gpt-3-5-turbo",
        }
    }

    /// Model id sent to the provider.
    pub fn provider_id(&self) -> &'static str {
        match self {
            WritingModel::Gpt4o => "gpt-4o",
            WritingModel::Gpt4Turbo => "gpt-4-turbo-preview",
            WritingModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WritingModel::Gpt4o => "Best for narrative and dialogue",
            WritingModel::Gpt4Turbo => "Alternative narrative voice",
            WritingModel::Gpt35Turbo => "Fast and cost-effective",
        }
    }
}

impl Default for WritingModel {
    fn default() -> Self {
        WritingModel::Gpt4o
    }
}

impl fmt::Display for WritingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WritingModel {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        WritingModel::ALL
            .into_iter()
            .find(|model| model.key() == key)
            .ok_or_else(|| AiError::UnknownModel(key.to_string()))
    }
}

/// Which path produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    Extractive,
    Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub method: SummaryMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_keys_round_trip() {
        for model in WritingModel::ALL {
            assert_eq!(model.key().parse::<WritingModel>().unwrap(), model);
        }
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let err = "claude-3-opus".parse::<WritingModel>().unwrap_err();
        assert!(matches!(err, AiError::UnknownModel(ref key) if key == "claude-3-opus"));
    }

    #[test]
    fn test_provider_ids() {
        assert_eq!(WritingModel::Gpt4Turbo.provider_id(), "gpt-4-turbo-preview");
        assert_eq!(WritingModel::Gpt35Turbo.provider_id(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_completion_request_skips_empty_options() {
        let request = CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![AiMessage::user("hi")],
            temperature: 0.5,
            max_tokens: None,
            top_p: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("top_p").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
