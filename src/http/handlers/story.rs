// Story endpoints. Translate the body into a core request and hand it to
// the story service.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::story::{ContinueStory, CreateStory, ReviseChapter, StoryResult};
use crate::http::dto::{ContinueStoryRequest, ReviseChapterRequest, StoryPromptRequest};
use crate::http::error::ApiResult;
use crate::http::state::AppState;

/// POST /story/create
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StoryPromptRequest>,
) -> ApiResult<Json<StoryResult>> {
    let request = CreateStory {
        model: state.resolve_model(body.model.as_deref())?,
        length: body.length.parse()?,
        prompt: body.prompt,
        genre: body.genre,
        project_name: body.project_name,
    };

    tracing::info!(project = %request.project_name, model = %request.model, "Creating story");
    Ok(Json(state.stories.create(request).await?))
}

/// POST /story/continue
pub async fn continue_story(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContinueStoryRequest>,
) -> ApiResult<Json<StoryResult>> {
    let request = ContinueStory {
        model: state.resolve_model(body.model.as_deref())?,
        project_name: body.project_name,
        context: body.context,
    };

    tracing::info!(project = %request.project_name, model = %request.model, "Continuing story");
    Ok(Json(state.stories.continue_story(request).await?))
}

/// POST /story/revise
pub async fn revise(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReviseChapterRequest>,
) -> ApiResult<Json<StoryResult>> {
    let request = ReviseChapter {
        model: state.resolve_model(body.model.as_deref())?,
        project_name: body.project_name,
        chapter_num: body.chapter_num,
        feedback: body.feedback,
    };

    tracing::info!(
        project = %request.project_name,
        chapter = request.chapter_num,
        "Revising chapter"
    );
    Ok(Json(state.stories.revise(request).await?))
}
