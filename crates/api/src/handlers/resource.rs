//! Handlers for the `/resources` resource: allocations under the per-user
//! capacity guard, plus workload and capacity views.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::types::DbId;
use khelo_db::models::allocation::{
    Allocation, AllocationWithUser, CapacityReport, CreateAllocation, ProjectResourceAnalytics,
    UpdateAllocation, WorkloadRow,
};
use khelo_db::repositories::AllocationRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/v1/resources/projects/{project_id}/allocations
pub async fn list_allocations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<AllocationWithUser>>> {
    let allocations = AllocationRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(allocations))
}

/// POST /api/v1/resources/projects/allocations
///
/// Allocate a user to a project. Rejected with 409 if the user is already
/// on the project, and 422 if their committed capacity would exceed 100%.
pub async fn create_allocation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateAllocation>,
) -> AppResult<(StatusCode, Json<Allocation>)> {
    input.validate()?;
    let allocation = AllocationRepo::allocate(&state.pool, &input, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

/// PUT /api/v1/resources/projects/allocations/{id}
pub async fn update_allocation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAllocation>,
) -> AppResult<Json<Allocation>> {
    input.validate()?;
    let allocation = AllocationRepo::reallocate(&state.pool, id, &input).await?;
    Ok(Json(allocation))
}

/// DELETE /api/v1/resources/projects/allocations/{id}
pub async fn delete_allocation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = AllocationRepo::deallocate(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Allocation",
            id,
        }));
    }
    Ok(Json(MessageResponse {
        message: "Allocation deleted successfully",
    }))
}

/// GET /api/v1/resources/workload
pub async fn workload(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<WorkloadRow>>> {
    let workload = AllocationRepo::workload(&state.pool).await?;
    Ok(Json(workload))
}

/// GET /api/v1/resources/projects/{project_id}/analytics
pub async fn project_analytics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ProjectResourceAnalytics>> {
    let analytics = AllocationRepo::project_analytics(&state.pool, project_id).await?;
    Ok(Json(analytics))
}

/// GET /api/v1/resources/capacity
pub async fn capacity(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<CapacityReport>> {
    let report = AllocationRepo::capacity(&state.pool).await?;
    Ok(Json(report))
}
