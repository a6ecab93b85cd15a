use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::http::handlers::{files, service, story, text};
use crate::http::state::AppState;

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Browser-based clients call the API directly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let story_routes = Router::new()
        .route("/create", post(story::create))
        .route("/continue", post(story::continue_story))
        .route("/revise", post(story::revise))
        .route("/models", get(service::models))
        .route("/status", get(service::status));

    let project_routes = Router::new()
        .route("/", get(files::list_projects))
        .route(
            "/{project}/files",
            get(files::list_files).post(files::create_file),
        )
        .route(
            "/{project}/files/{title}",
            get(files::read_file).delete(files::delete_file),
        )
        .route("/{project}/files/{title}/append", post(files::append_file))
        .route("/{project}/files/{title}/move", post(files::move_file))
        .route("/{project}/files/{title}/copy", post(files::copy_file));

    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .route("/summarize", post(text::summarize))
        .route("/chat", post(text::chat))
        .nest("/story", story_routes)
        .nest("/projects", project_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
