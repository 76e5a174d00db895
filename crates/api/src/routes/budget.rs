//! Route definitions for the `/budget` resource.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::budget;
use crate::state::AppState;

/// Routes mounted at `/budget`.
///
/// ```text
/// GET    /projects/{project_id}           -> overview
/// GET    /projects/{project_id}/expenses  -> list_expenses
/// POST   /expenses                        -> create_expense
/// PUT    /expenses/{id}                   -> update_expense
/// PATCH  /expenses/{id}/approve           -> approve_expense (Manager/Admin)
/// DELETE /expenses/{id}                   -> delete_expense
/// GET    /categories                      -> list_categories
/// POST   /categories                      -> create_category
/// GET    /analytics                       -> analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{project_id}", get(budget::overview))
        .route(
            "/projects/{project_id}/expenses",
            get(budget::list_expenses),
        )
        .route("/expenses", post(budget::create_expense))
        .route(
            "/expenses/{id}",
            put(budget::update_expense).delete(budget::delete_expense),
        )
        .route("/expenses/{id}/approve", patch(budget::approve_expense))
        .route(
            "/categories",
            get(budget::list_categories).post(budget::create_category),
        )
        .route("/analytics", get(budget::analytics))
}
