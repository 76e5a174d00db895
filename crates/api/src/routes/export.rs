//! Route definitions for the `/export` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
///
/// ```text
/// GET /projects/csv   -> projects_csv
/// GET /analytics/csv  -> analytics_csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/csv", get(export::projects_csv))
        .route("/analytics/csv", get(export::analytics_csv))
}
