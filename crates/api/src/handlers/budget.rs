//! Handlers for the `/budget` resource: the expense ledger, categories,
//! and budget analytics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::types::DbId;
use khelo_db::models::expense::{
    BudgetAnalytics, BudgetOverview, CreateExpense, CreateExpenseCategory, Expense,
    ExpenseCategory, ExpenseFilter, ExpenseWithNames, UpdateExpense,
};
use khelo_db::repositories::ExpenseRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `PATCH /budget/expenses/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

/// GET /api/v1/budget/projects/{project_id}
///
/// Budget overview: spend vs ceiling, per-category aggregates, recent
/// expenses, and the approved/pending split.
pub async fn overview(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<BudgetOverview>> {
    let overview = ExpenseRepo::overview(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(Json(overview))
}

/// GET /api/v1/budget/projects/{project_id}/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
    Query(filter): Query<ExpenseFilter>,
) -> AppResult<Json<Vec<ExpenseWithNames>>> {
    let expenses = ExpenseRepo::list_for_project(&state.pool, project_id, &filter).await?;
    Ok(Json(expenses))
}

/// POST /api/v1/budget/expenses
///
/// Record an expense. The owning project's `actual_cost` and
/// `budget_status` are updated in the same transaction.
pub async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    input.validate()?;
    let expense = ExpenseRepo::record(&state.pool, &input, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/v1/budget/expenses/{id}
///
/// Revise an expense; the amount delta propagates to the project ledger.
pub async fn update_expense(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    input.validate()?;
    let expense = ExpenseRepo::revise(&state.pool, id, &input).await?;
    Ok(Json(expense))
}

/// PATCH /api/v1/budget/expenses/{id}/approve
///
/// Approve or reject an expense. A workflow flag only: the ledger already
/// reflects the amount from submission time. Manager or Admin only.
pub async fn approve_expense(
    State(state): State<AppState>,
    RequireManager(approver): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<ApprovalRequest>,
) -> AppResult<Json<Expense>> {
    let expense = ExpenseRepo::set_approval(&state.pool, id, input.approved, approver.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;
    Ok(Json(expense))
}

/// DELETE /api/v1/budget/expenses/{id}
///
/// Remove an expense, subtracting its amount back out of the ledger.
pub async fn delete_expense(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    ExpenseRepo::remove(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "Expense deleted successfully",
    }))
}

/// GET /api/v1/budget/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<ExpenseCategory>>> {
    let categories = ExpenseRepo::list_categories(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /api/v1/budget/categories
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateExpenseCategory>,
) -> AppResult<(StatusCode, Json<ExpenseCategory>)> {
    input.validate()?;
    let category = ExpenseRepo::create_category(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/budget/analytics
pub async fn analytics(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<BudgetAnalytics>> {
    let analytics = ExpenseRepo::analytics(&state.pool).await?;
    Ok(Json(analytics))
}
