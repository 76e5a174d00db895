//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::roles::is_management;
use khelo_core::types::DbId;
use khelo_db::models::project::{CreateProject, Project, ProjectWithCreator, UpdateProject};
use khelo_db::repositories::ProjectRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications::notify_project_event;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, &input, auth.user_id).await?;

    notify_project_event(
        &state,
        project.id,
        auth.user_id,
        project.name.clone(),
        "created",
    );

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<ProjectWithCreator>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Only the project creator, Managers, or Admins may delete a project.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let can_delete = project.created_by == Some(auth.user_id) || is_management(&auth.role);
    if !can_delete {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to delete this project".into(),
        )));
    }

    ProjectRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
