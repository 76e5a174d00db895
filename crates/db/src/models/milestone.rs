//! Milestone entity model and DTOs.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: String,
    pub order_index: i32,
    pub created_at: Timestamp,
}

/// Milestone row with task rollups, used by the timeline view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MilestoneWithTaskCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub milestone: Milestone,
    pub task_count: i64,
    pub completed_tasks: i64,
}

/// DTO for creating a milestone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 255, message = "Milestone name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub order_index: Option<i32>,
}

/// DTO for updating a milestone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMilestone {
    #[validate(length(min = 1, max = 255, message = "Milestone name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: String,
    pub completed_date: Option<NaiveDate>,
    pub order_index: i32,
}
