// Story workflow: build a prompt, have the writer model produce prose, and
// file the result under the project's folder.
//
// Storage availability is checked before the model is called.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::story_prompts::{self, StoryLength};
use crate::core::ai::{AiError, AiProvider, AiService, WritingModel};
use crate::core::storage::{ProjectFileService, StorageError};
use crate::core::summary;

/// Characters of generated prose echoed back in responses.
const PREVIEW_CHARS: usize = 500;

/// Characters of the prompt used to name the first chapter file.
const TITLE_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid story request: {0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct CreateStory {
    pub prompt: String,
    pub genre: String,
    pub length: StoryLength,
    pub project_name: String,
    pub model: WritingModel,
}

#[derive(Debug, Clone)]
pub struct ContinueStory {
    pub project_name: String,
    pub context: String,
    pub model: WritingModel,
}

#[derive(Debug, Clone)]
pub struct ReviseChapter {
    pub project_name: String,
    pub chapter_num: u32,
    pub feedback: String,
    pub model: WritingModel,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    pub word_count: usize,
    pub project: String,
    pub filename: String,
    pub file_id: String,
    pub drive_link: Option<String>,
    pub preview: String,
}

pub struct StoryService<P: AiProvider> {
    ai: Arc<AiService<P>>,
    files: Arc<ProjectFileService>,
}

impl<P: AiProvider> StoryService<P> {
    pub fn new(ai: Arc<AiService<P>>, files: Arc<ProjectFileService>) -> Self {
        Self { ai, files }
    }

    pub async fn create(&self, request: CreateStory) -> Result<StoryResult, StoryError> {
        require("prompt", &request.prompt)?;
        self.files.ensure_available()?;

        let prompt = story_prompts::opening_chapter(&request.prompt, &request.genre, request.length);
        let content = self.ai.write(&prompt, request.model).await?;

        let filename = format!("Chapter_1_{}", chapter_title(&request.prompt));
        self.file(
            &request.project_name,
            &filename,
            content,
            Some(1),
            "Story chapter created and saved to Google Drive".to_string(),
        )
        .await
    }

    pub async fn continue_story(&self, request: ContinueStory) -> Result<StoryResult, StoryError> {
        require("context", &request.context)?;
        self.files.ensure_available()?;

        let prompt = story_prompts::continuation(&request.context);
        let content = self.ai.write(&prompt, request.model).await?;

        // Timestamped so successive continuations don't overwrite each other.
        let filename = format!("continuation_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        self.file(
            &request.project_name,
            &filename,
            content,
            None,
            "Story continued and saved to Google Drive".to_string(),
        )
        .await
    }

    pub async fn revise(&self, request: ReviseChapter) -> Result<StoryResult, StoryError> {
        require("feedback", &request.feedback)?;
        if request.chapter_num == 0 {
            return Err(StoryError::Validation(
                "chapter_num must be at least 1".to_string(),
            ));
        }
        self.files.ensure_available()?;

        let prompt = story_prompts::revision(request.chapter_num, &request.feedback);
        let content = self.ai.write(&prompt, request.model).await?;

        let filename = format!("Chapter_{}_REVISED", request.chapter_num);
        self.file(
            &request.project_name,
            &filename,
            content,
            Some(request.chapter_num),
            format!("Chapter {} revised and saved", request.chapter_num),
        )
        .await
    }

    async fn file(
        &self,
        project: &str,
        filename: &str,
        content: String,
        chapter: Option<u32>,
        message: String,
    ) -> Result<StoryResult, StoryError> {
        let stored = self.files.save(project, filename, &content).await?;

        tracing::info!(
            project = %stored.project,
            file = %stored.name,
            words = word_count(&content),
            "Story saved"
        );

        Ok(StoryResult {
            status: "success".to_string(),
            message,
            chapter,
            word_count: word_count(&content),
            project: stored.project,
            filename: stored.name,
            file_id: stored.id,
            drive_link: stored.web_view_link,
            preview: summary::truncate_chars(&content, PREVIEW_CHARS),
        })
    }
}

fn require(field: &str, value: &str) -> Result<(), StoryError> {
    if value.trim().is_empty() {
        return Err(StoryError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First characters of the prompt with whitespace and slashes replaced,
/// usable as a file name.
pub fn chapter_title(prompt: &str) -> String {
    prompt
        .trim()
        .chars()
        .take(TITLE_CHARS)
        .map(|c| if c.is_whitespace() || c == '/' { '_' } else { c })
        .collect()
}
