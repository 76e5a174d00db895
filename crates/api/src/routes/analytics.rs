//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /projects  -> projects
/// GET /users     -> users
/// GET /files     -> files
/// GET /comments  -> comments
/// GET /overview  -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(analytics::projects))
        .route("/users", get(analytics::users))
        .route("/files", get(analytics::files))
        .route("/comments", get(analytics::comments))
        .route("/overview", get(analytics::overview))
}
