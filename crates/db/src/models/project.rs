//! Project entity model and DTOs.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
///
/// `progress`, `actual_cost`, and `budget_status` are derived fields: they
/// are written only by the task and expense repositories, never directly by
/// a client request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub scope: Option<String>,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub actual_start_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    pub progress: i32,
    pub budget: Decimal,
    pub actual_cost: Decimal,
    pub budget_status: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255, message = "Project name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub scope: Option<String>,
    /// Defaults to `Planning` if omitted.
    pub status: Option<String>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255, message = "Project name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub scope: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub actual_start_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
}

/// Project row joined with the creator's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithCreator {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub created_by_name: Option<String>,
}
