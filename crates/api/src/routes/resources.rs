//! Route definitions for the `/resources` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::resource;
use crate::state::AppState;

/// Routes mounted at `/resources`.
///
/// ```text
/// GET    /projects/{project_id}/allocations  -> list_allocations
/// POST   /projects/allocations               -> create_allocation
/// PUT    /projects/allocations/{id}          -> update_allocation
/// DELETE /projects/allocations/{id}          -> delete_allocation
/// GET    /projects/{project_id}/analytics    -> project_analytics
/// GET    /workload                           -> workload
/// GET    /capacity                           -> capacity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/allocations",
            get(resource::list_allocations),
        )
        .route("/projects/allocations", post(resource::create_allocation))
        .route(
            "/projects/allocations/{id}",
            put(resource::update_allocation).delete(resource::delete_allocation),
        )
        .route(
            "/projects/{project_id}/analytics",
            get(resource::project_analytics),
        )
        .route("/workload", get(resource::workload))
        .route("/capacity", get(resource::capacity))
}
