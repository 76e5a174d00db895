//! Route definitions for the `/files` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::attachment;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// POST   /upload                -> upload (multipart)
/// GET    /project/{project_id}  -> list_for_project
/// GET    /download/{id}         -> download
/// DELETE /{id}                  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(attachment::upload))
        .route("/project/{project_id}", get(attachment::list_for_project))
        .route("/download/{id}", get(attachment::download))
        .route("/{id}", delete(attachment::delete))
}
