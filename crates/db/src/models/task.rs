//! Task and task-dependency models and DTOs.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub milestone_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub order_index: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Task row joined with assignee and milestone display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub assigned_to_name: Option<String>,
    pub milestone_name: Option<String>,
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    pub project_id: DbId,
    pub milestone_id: Option<DbId>,
    #[validate(length(min = 1, max = 255, message = "Task name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `To Do` if omitted.
    pub status: Option<String>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<String>,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<Decimal>,
    pub order_index: Option<i32>,
}

/// DTO for updating a task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 255, message = "Task name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub order_index: i32,
}

/// A row from the `task_dependencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDependency {
    pub id: DbId,
    pub task_id: DbId,
    pub depends_on_task_id: DbId,
    pub dependency_type: String,
    pub created_at: Timestamp,
}

/// Dependency row joined with the prerequisite task's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDependencyWithName {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub dependency: TaskDependency,
    pub depends_on_task_name: String,
}

/// DTO for adding a task dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskDependency {
    pub depends_on_task_id: DbId,
    /// Defaults to `Finish-to-Start` if omitted.
    pub dependency_type: Option<String>,
}

/// Result of a progress recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub progress: i32,
    pub total_tasks: i64,
    pub completed_tasks: i64,
}
