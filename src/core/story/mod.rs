pub mod story_prompts;
pub mod story_service;

pub use story_prompts::{StoryLength, WRITER_PERSONA};
pub use story_service::{
    ContinueStory, CreateStory, ReviseChapter, StoryError, StoryResult, StoryService,
};
