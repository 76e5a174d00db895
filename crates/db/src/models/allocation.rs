//! Resource allocation models and DTOs, plus workload/capacity aggregates.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `resource_allocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Allocation {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub allocation_percentage: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Allocation row joined with the allocated user's identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AllocationWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub allocation: Allocation,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
}

/// DTO for allocating a user to a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAllocation {
    pub project_id: DbId,
    pub user_id: DbId,
    #[validate(length(min = 1, max = 100, message = "Allocation role is required"))]
    pub role: String,
    pub allocation_percentage: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// DTO for updating an existing allocation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAllocation {
    #[validate(length(min = 1, max = 100, message = "Allocation role is required"))]
    pub role: String,
    pub allocation_percentage: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Workload / capacity aggregates
// ---------------------------------------------------------------------------

/// Per-user workload rollup across all projects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub estimated_hours: Decimal,
    pub actual_hours: Decimal,
    pub total_allocation: i64,
}

/// Allocation summary for a single project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AllocationSummary {
    pub total_resources: i64,
    pub total_allocation: Option<i64>,
    pub avg_allocation: Option<Decimal>,
}

/// Task rollup per allocated resource within a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResourceTaskRow {
    pub id: DbId,
    pub name: String,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub estimated_hours: Decimal,
    pub actual_hours: Decimal,
}

/// Resource analytics for a single project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResourceAnalytics {
    pub allocation_summary: AllocationSummary,
    pub tasks_by_resource: Vec<ResourceTaskRow>,
}

/// Fleet-wide capacity headline numbers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverallCapacity {
    pub total_users: i64,
    pub allocated_users: i64,
    pub total_allocation: Option<i64>,
    pub avg_allocation: Option<Decimal>,
}

/// Capacity aggregate per organizational role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleCapacity {
    pub role: String,
    pub total_users: i64,
    pub allocated_users: i64,
    pub total_allocation: i64,
    pub avg_allocation: Decimal,
}

/// Remaining capacity per user, most available first.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAvailability {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub total_allocation: i64,
    pub available_capacity: i64,
}

/// Full capacity planning response.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityReport {
    pub overall_capacity: OverallCapacity,
    pub capacity_by_role: Vec<RoleCapacity>,
    pub resource_availability: Vec<UserAvailability>,
}
