// Project file endpoints. Name validation and title normalisation happen in
// ProjectFileService.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::storage::StoredFile;
use crate::http::dto::{
    AppendRequest, CopyRequest, CreateFileRequest, DeletedResponse, FileContentResponse,
    FileListResponse, MoveRequest, ProjectsResponse,
};
use crate::http::error::ApiResult;
use crate::http::state::AppState;

/// GET /projects
pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProjectsResponse>> {
    let projects = state.files.list_projects().await?;
    Ok(Json(ProjectsResponse { projects }))
}

/// GET /projects/{project}/files
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> ApiResult<Json<FileListResponse>> {
    let files = state.files.list(&project).await?;
    Ok(Json(FileListResponse { project, files }))
}

/// POST /projects/{project}/files
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(body): Json<CreateFileRequest>,
) -> ApiResult<(StatusCode, Json<StoredFile>)> {
    let file = state.files.create(&project, &body.title, &body.content).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /projects/{project}/files/{title}
pub async fn read_file(
    State(state): State<Arc<AppState>>,
    Path((project, title)): Path<(String, String)>,
) -> ApiResult<Json<FileContentResponse>> {
    let content = state.files.read(&project, &title).await?;
    Ok(Json(FileContentResponse {
        project,
        title,
        content,
    }))
}

/// POST /projects/{project}/files/{title}/append
pub async fn append_file(
    State(state): State<Arc<AppState>>,
    Path((project, title)): Path<(String, String)>,
    Json(body): Json<AppendRequest>,
) -> ApiResult<Json<StoredFile>> {
    Ok(Json(state.files.append(&project, &title, &body.content).await?))
}

/// DELETE /projects/{project}/files/{title}
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((project, title)): Path<(String, String)>,
) -> ApiResult<Json<DeletedResponse>> {
    state.files.delete(&project, &title).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

/// POST /projects/{project}/files/{title}/move
pub async fn move_file(
    State(state): State<Arc<AppState>>,
    Path((project, title)): Path<(String, String)>,
    Json(body): Json<MoveRequest>,
) -> ApiResult<Json<StoredFile>> {
    Ok(Json(
        state
            .files
            .move_to(&project, &title, &body.to_project)
            .await?,
    ))
}

/// POST /projects/{project}/files/{title}/copy
pub async fn copy_file(
    State(state): State<Arc<AppState>>,
    Path((project, title)): Path<(String, String)>,
    Json(body): Json<CopyRequest>,
) -> ApiResult<Json<StoredFile>> {
    Ok(Json(
        state
            .files
            .copy_to(&project, &title, &body.to_project, body.new_title.as_deref())
            .await?,
    ))
}
