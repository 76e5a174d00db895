//! Route definitions for the `/comments` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /project/{project_id}  -> list_for_project
/// POST   /                      -> create
/// PUT    /{id}                  -> update (author only)
/// DELETE /{id}                  -> delete (author, project creator, Admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/project/{project_id}", get(comment::list_for_project))
        .route("/", post(comment::create))
        .route("/{id}", put(comment::update).delete(comment::delete))
}
