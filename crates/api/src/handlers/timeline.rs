//! Handlers for the `/timeline` resource: the project timeline view,
//! milestones, tasks, dependencies, deadline statistics, and the explicit
//! progress recomputation endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::types::DbId;
use khelo_db::models::analytics::TimelineStats;
use khelo_db::models::milestone::{CreateMilestone, Milestone, MilestoneWithTaskCounts, UpdateMilestone};
use khelo_db::models::project::Project;
use khelo_db::models::task::{
    CreateTask, CreateTaskDependency, ProgressSnapshot, Task, TaskDependency,
    TaskDependencyWithName, TaskWithNames, UpdateTask,
};
use khelo_db::repositories::{AnalyticsRepo, MilestoneRepo, ProjectRepo, TaskRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Timeline view
// ---------------------------------------------------------------------------

/// A milestone with its tasks attached, for the timeline view.
#[derive(Debug, Serialize)]
pub struct MilestoneTimeline {
    #[serde(flatten)]
    pub milestone: MilestoneWithTaskCounts,
    pub tasks: Vec<TaskWithNames>,
}

/// Response body for `GET /timeline/projects/{project_id}`.
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub project: Project,
    pub milestones: Vec<MilestoneTimeline>,
    pub unassigned_tasks: Vec<TaskWithNames>,
    pub dependencies: Vec<TaskDependencyWithName>,
}

/// GET /api/v1/timeline/projects/{project_id}
///
/// The full timeline: project, milestones with their tasks, tasks not
/// assigned to any milestone, and dependency edges.
pub async fn project_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<TimelineResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let milestones = MilestoneRepo::list_with_task_counts(&state.pool, project_id).await?;
    let mut tasks = TaskRepo::list_for_project(&state.pool, project_id).await?;
    let dependencies = TaskRepo::dependencies_for_project(&state.pool, project_id).await?;

    let mut grouped = Vec::with_capacity(milestones.len());
    for milestone in milestones {
        let milestone_id = milestone.milestone.id;
        let (mine, rest): (Vec<_>, Vec<_>) = tasks
            .into_iter()
            .partition(|t| t.task.milestone_id == Some(milestone_id));
        tasks = rest;
        grouped.push(MilestoneTimeline {
            milestone,
            tasks: mine,
        });
    }

    Ok(Json(TimelineResponse {
        project,
        milestones: grouped,
        unassigned_tasks: tasks,
        dependencies,
    }))
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// POST /api/v1/timeline/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    input.validate()?;
    let milestone = MilestoneRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(milestone)))
}

/// PUT /api/v1/timeline/milestones/{id}
pub async fn update_milestone(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<Json<Milestone>> {
    input.validate()?;
    let milestone = MilestoneRepo::update(&state.pool, id, &input).await?;
    Ok(Json(milestone))
}

/// DELETE /api/v1/timeline/milestones/{id}
pub async fn delete_milestone(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = MilestoneRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }));
    }
    Ok(Json(MessageResponse {
        message: "Milestone deleted successfully",
    }))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// POST /api/v1/timeline/tasks
///
/// Create a task. The project's `progress` is refreshed in the same
/// transaction.
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    let task = TaskRepo::create(&state.pool, &input, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/timeline/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    let task = TaskRepo::update(&state.pool, id, &input).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/timeline/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    TaskRepo::delete(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// POST /api/v1/timeline/tasks/{task_id}/dependencies
pub async fn add_dependency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(task_id): Path<DbId>,
    Json(input): Json<CreateTaskDependency>,
) -> AppResult<(StatusCode, Json<TaskDependency>)> {
    let dependency = TaskRepo::add_dependency(&state.pool, task_id, &input).await?;
    Ok((StatusCode::CREATED, Json(dependency)))
}

/// DELETE /api/v1/timeline/tasks/{task_id}/dependencies/{dependency_id}
pub async fn remove_dependency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((task_id, dependency_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    let removed = TaskRepo::remove_dependency(&state.pool, task_id, dependency_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Dependency",
            id: dependency_id,
        }));
    }
    Ok(Json(MessageResponse {
        message: "Dependency removed successfully",
    }))
}

// ---------------------------------------------------------------------------
// Stats and progress
// ---------------------------------------------------------------------------

/// GET /api/v1/timeline/stats
pub async fn stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<TimelineStats>> {
    let stats = AnalyticsRepo::timeline_stats(&state.pool).await?;
    Ok(Json(stats))
}

/// POST /api/v1/timeline/projects/{project_id}/update-progress
///
/// Explicitly recompute a project's progress from its task set. Task
/// writes already keep progress current; this endpoint returns the same
/// snapshot on demand.
pub async fn update_progress(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ProgressSnapshot>> {
    let snapshot = TaskRepo::recalculate_progress(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(Json(snapshot))
}
