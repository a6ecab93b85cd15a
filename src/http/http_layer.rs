// HTTP layer - axum routes, request/response bodies and error mapping.
//
// Handlers stay thin: parse the body, call a core service, serialize the
// result. Everything else lives in `core/`.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

#[path = "handlers/handler_catalog.rs"]
pub mod handlers;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::{AppState, DynProvider};
