//! Route tree assembly.

pub mod analytics;
pub mod budget;
pub mod comments;
pub mod export;
pub mod files;
pub mod health;
pub mod projects;
pub mod resources;
pub mod search;
pub mod timeline;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                          register (public)
/// /users/login                             login (public)
/// /users/profile                           current user profile
/// /users                                   user directory
///
/// /projects                                list, create
/// /projects/{id}                           get, update, delete
///
/// /budget/projects/{project_id}            budget overview
/// /budget/projects/{project_id}/expenses   expense listing with filters
/// /budget/expenses                         record expense
/// /budget/expenses/{id}                    revise, delete expense
/// /budget/expenses/{id}/approve            approval flag (Manager/Admin)
/// /budget/categories                       list, create categories
/// /budget/analytics                        fleet-wide budget analytics
///
/// /resources/projects/{project_id}/allocations   project allocations
/// /resources/projects/allocations                allocate (capacity guard)
/// /resources/projects/allocations/{id}           reallocate, deallocate
/// /resources/projects/{project_id}/analytics     per-project resource view
/// /resources/workload                            per-user workload
/// /resources/capacity                            capacity planning
///
/// /timeline/projects/{project_id}                  timeline view
/// /timeline/projects/{project_id}/update-progress  progress recompute
/// /timeline/milestones[/{id}]                      milestone CRUD
/// /timeline/tasks[/{id}]                           task CRUD
/// /timeline/tasks/{task_id}/dependencies[/{id}]    dependency edges
/// /timeline/stats                                  deadline statistics
///
/// /comments/project/{project_id}           project comments
/// /comments[/{id}]                         comment CRUD
///
/// /files/upload                            multipart upload
/// /files/project/{project_id}              attachment listing
/// /files/download/{id}                     download
/// /files/{id}                              delete
///
/// /search[/projects|/files|/suggestions]   search endpoints
/// /analytics/...                           aggregate statistics
/// /export/...                              CSV downloads
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/budget", budget::router())
        .nest("/resources", resources::router())
        .nest("/timeline", timeline::router())
        .nest("/comments", comments::router())
        .nest("/files", files::router())
        .nest("/search", search::router())
        .nest("/analytics", analytics::router())
        .nest("/export", export::router())
}
