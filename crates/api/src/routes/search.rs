//! Route definitions for the `/search` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET /             -> unified
/// GET /projects     -> projects
/// GET /files        -> files
/// GET /suggestions  -> suggestions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::unified))
        .route("/projects", get(search::projects))
        .route("/files", get(search::files))
        .route("/suggestions", get(search::suggestions))
}
