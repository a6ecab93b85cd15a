use std::sync::Arc;

use crate::core::ai::{AiError, AiProvider, AiService, WritingModel};
use crate::core::storage::ProjectFileService;
use crate::core::story::StoryService;

/// The provider is picked at startup, so handlers see it boxed.
pub type DynProvider = Box<dyn AiProvider>;

pub const SERVICE_NAME: &str = "Isabella Master Storyteller";
pub const SERVICE_VERSION: &str = "5.0.0";

/// Shared, immutable state handed to every handler.
pub struct AppState {
    pub ai: Arc<AiService<DynProvider>>,
    pub stories: StoryService<DynProvider>,
    pub files: Arc<ProjectFileService>,
    pub default_model: WritingModel,
}

impl AppState {
    pub fn new(
        ai: AiService<DynProvider>,
        files: ProjectFileService,
        default_model: WritingModel,
    ) -> Self {
        let ai = Arc::new(ai);
        let files = Arc::new(files);

        Self {
            stories: StoryService::new(Arc::clone(&ai), Arc::clone(&files)),
            ai,
            files,
            default_model,
        }
    }

    /// Parses a requested model key, falling back to the configured default.
    pub fn resolve_model(&self, requested: Option<&str>) -> Result<WritingModel, AiError> {
        match requested.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => key.parse(),
            None => Ok(self.default_model),
        }
    }
}
