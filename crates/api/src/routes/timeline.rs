//! Route definitions for the `/timeline` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::timeline;
use crate::state::AppState;

/// Routes mounted at `/timeline`.
///
/// ```text
/// GET    /projects/{project_id}                     -> project_timeline
/// POST   /projects/{project_id}/update-progress     -> update_progress
/// POST   /milestones                                -> create_milestone
/// PUT    /milestones/{id}                           -> update_milestone
/// DELETE /milestones/{id}                           -> delete_milestone
/// POST   /tasks                                     -> create_task
/// PUT    /tasks/{id}                                -> update_task
/// DELETE /tasks/{id}                                -> delete_task
/// POST   /tasks/{task_id}/dependencies              -> add_dependency
/// DELETE /tasks/{task_id}/dependencies/{dependency_id} -> remove_dependency
/// GET    /stats                                     -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{project_id}", get(timeline::project_timeline))
        .route(
            "/projects/{project_id}/update-progress",
            post(timeline::update_progress),
        )
        .route("/milestones", post(timeline::create_milestone))
        .route(
            "/milestones/{id}",
            put(timeline::update_milestone).delete(timeline::delete_milestone),
        )
        .route("/tasks", post(timeline::create_task))
        .route(
            "/tasks/{id}",
            put(timeline::update_task).delete(timeline::delete_task),
        )
        .route(
            "/tasks/{task_id}/dependencies",
            post(timeline::add_dependency),
        )
        .route(
            "/tasks/{task_id}/dependencies/{dependency_id}",
            axum::routing::delete(timeline::remove_dependency),
        )
        .route("/stats", get(timeline::stats))
}
