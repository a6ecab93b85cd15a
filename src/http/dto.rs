// Request and response bodies. Model names arrive as plain strings and are
// parsed in the handlers so unknown keys map to UNKNOWN_MODEL.

use serde::{Deserialize, Serialize};

use crate::core::ai::{AiMessage, SummaryMethod};
use crate::core::storage::StoredFile;
use crate::core::summary::DEFAULT_MAX_LENGTH;

pub const DEFAULT_PROJECT: &str = "Isabella_Stories";

fn default_genre() -> String {
    "auto".to_string()
}

fn default_length() -> String {
    "chapter".to_string()
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

#[derive(Debug, Deserialize)]
pub struct StoryPromptRequest {
    pub prompt: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default = "default_project")]
    pub project_name: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContinueStoryRequest {
    pub project_name: String,
    pub context: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviseChapterRequest {
    pub project_name: String,
    pub chapter_num: u32,
    pub feedback: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// When absent the extractive summarizer is used.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub method: SummaryMethod,
    pub original_length: usize,
    pub summary_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub messages: Vec<AiMessage>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub project: String,
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Serialize)]
pub struct FileContentResponse {
    pub project: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub to_project: String,
}

#[derive(Debug, Deserialize)]
pub struct CopyRequest {
    pub to_project: String,
    #[serde(default)]
    pub new_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_story_prompt_defaults() {
        let req: StoryPromptRequest =
            serde_json::from_value(json!({"prompt": "A lighthouse keeper"})).unwrap();
        assert_eq!(req.genre, "auto");
        assert_eq!(req.length, "chapter");
        assert_eq!(req.project_name, DEFAULT_PROJECT);
        assert!(req.model.is_none());
    }

    #[test]
    fn test_summarize_default_length() {
        let req: SummarizeRequest = serde_json::from_value(json!({"text": "abc"})).unwrap();
        assert_eq!(req.max_length, 300);
    }
}
