//! Repository for the `resource_allocations` table and capacity views.
//!
//! Capacity is a property of the person, not any one project: the guard
//! sums a user's allocation rows across all projects and rejects anything
//! that would push the total past 100%. The check-and-insert runs inside a
//! transaction holding `pg_advisory_xact_lock` keyed on the user id, so two
//! concurrent allocations for the same user cannot both pass the check.

use khelo_core::capacity::{check_capacity, validate_percentage};
use khelo_core::error::CoreError;
use khelo_core::status::TASK_STATUS_COMPLETED;
use khelo_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::allocation::{
    Allocation, AllocationSummary, AllocationWithUser, CapacityReport, CreateAllocation,
    OverallCapacity, ProjectResourceAnalytics, ResourceTaskRow, RoleCapacity, UpdateAllocation,
    UserAvailability, WorkloadRow,
};

/// Column list shared across allocation queries.
const COLUMNS: &str = "id, project_id, user_id, role, allocation_percentage, \
    start_date, end_date, created_by, created_at, updated_at";

/// Allocation columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str = "ra.id, ra.project_id, ra.user_id, ra.role, \
    ra.allocation_percentage, ra.start_date, ra.end_date, ra.created_by, \
    ra.created_at, ra.updated_at";

/// Provides allocation operations with the per-user capacity guard.
pub struct AllocationRepo;

impl AllocationRepo {
    // -----------------------------------------------------------------------
    // Guarded mutations
    // -----------------------------------------------------------------------

    /// Allocate a user to a project.
    ///
    /// Fails with `Conflict` if the user already has an allocation on the
    /// project, and with `CapacityExceeded` if the user's committed total
    /// plus the requested percentage would exceed 100.
    pub async fn allocate(
        pool: &PgPool,
        input: &CreateAllocation,
        created_by: DbId,
    ) -> Result<Allocation, DbError> {
        validate_percentage(input.allocation_percentage)?;

        let mut tx = pool.begin().await?;
        Self::lock_user_capacity(&mut tx, input.user_id).await?;

        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(input.project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if project_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            }
            .into());
        }

        let user_exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(input.user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if user_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            }
            .into());
        }

        let existing: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM resource_allocations WHERE project_id = $1 AND user_id = $2",
        )
        .bind(input.project_id)
        .bind(input.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(
                CoreError::Conflict("Resource already allocated to this project".into()).into(),
            );
        }

        let current_total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(allocation_percentage) FROM resource_allocations WHERE user_id = $1",
        )
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;
        check_capacity(current_total.unwrap_or(0), input.allocation_percentage)?;

        let insert = format!(
            "INSERT INTO resource_allocations \
                (project_id, user_id, role, allocation_percentage, \
                 start_date, end_date, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let allocation = sqlx::query_as::<_, Allocation>(&insert)
            .bind(input.project_id)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(input.allocation_percentage)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            allocation_id = allocation.id,
            user_id = allocation.user_id,
            percentage = allocation.allocation_percentage,
            "Resource allocated"
        );
        Ok(allocation)
    }

    /// Update an allocation in place, rechecking the capacity ceiling with
    /// the row under update excluded from the committed total.
    pub async fn reallocate(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAllocation,
    ) -> Result<Allocation, DbError> {
        validate_percentage(input.allocation_percentage)?;

        let mut tx = pool.begin().await?;

        let user_id: Option<(DbId,)> =
            sqlx::query_as("SELECT user_id FROM resource_allocations WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (user_id,) = user_id.ok_or(CoreError::NotFound {
            entity: "Allocation",
            id,
        })?;

        Self::lock_user_capacity(&mut tx, user_id).await?;

        let current_total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(allocation_percentage) FROM resource_allocations \
             WHERE user_id = $1 AND id != $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        check_capacity(current_total.unwrap_or(0), input.allocation_percentage)?;

        let update = format!(
            "UPDATE resource_allocations \
             SET role = $2, allocation_percentage = $3, start_date = $4, \
                 end_date = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let allocation = sqlx::query_as::<_, Allocation>(&update)
            .bind(id)
            .bind(&input.role)
            .bind(input.allocation_percentage)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(allocation)
    }

    /// Remove an allocation. No capacity recheck: removal can only free
    /// capacity. Returns `true` if a row was deleted.
    pub async fn deallocate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resource_allocations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Serialize capacity checks for one user.
    async fn lock_user_capacity(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// List a project's allocations with the allocated users' identities.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AllocationWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    u.name AS user_name, u.email AS user_email, u.role AS user_role \
             FROM resource_allocations ra \
             JOIN users u ON ra.user_id = u.id \
             WHERE ra.project_id = $1 \
             ORDER BY ra.created_at DESC"
        );
        sqlx::query_as::<_, AllocationWithUser>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Per-user workload rollup across all projects.
    pub async fn workload(pool: &PgPool) -> Result<Vec<WorkloadRow>, sqlx::Error> {
        sqlx::query_as::<_, WorkloadRow>(
            "SELECT u.id, u.name, u.email, u.role, \
                    COUNT(pt.id) AS total_tasks, \
                    COUNT(pt.id) FILTER (WHERE pt.status = $1) AS completed_tasks, \
                    COUNT(pt.id) FILTER \
                        (WHERE pt.due_date < CURRENT_DATE AND pt.status != $1) AS overdue_tasks, \
                    COALESCE(SUM(pt.estimated_hours), 0) AS estimated_hours, \
                    COALESCE(SUM(pt.actual_hours), 0) AS actual_hours, \
                    COALESCE((SELECT SUM(ra.allocation_percentage) \
                              FROM resource_allocations ra \
                              WHERE ra.user_id = u.id), 0) AS total_allocation \
             FROM users u \
             LEFT JOIN project_tasks pt ON u.id = pt.assigned_to \
             GROUP BY u.id, u.name, u.email, u.role \
             ORDER BY u.name",
        )
        .bind(TASK_STATUS_COMPLETED)
        .fetch_all(pool)
        .await
    }

    /// Allocation summary and per-resource task rollups for one project.
    pub async fn project_analytics(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<ProjectResourceAnalytics, sqlx::Error> {
        let allocation_summary = sqlx::query_as::<_, AllocationSummary>(
            "SELECT COUNT(*) AS total_resources, \
                    SUM(allocation_percentage) AS total_allocation, \
                    AVG(allocation_percentage) AS avg_allocation \
             FROM resource_allocations \
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        let tasks_by_resource = sqlx::query_as::<_, ResourceTaskRow>(
            "SELECT u.id, u.name, \
                    COUNT(pt.id) AS total_tasks, \
                    COUNT(pt.id) FILTER (WHERE pt.status = $2) AS completed_tasks, \
                    COUNT(pt.id) FILTER \
                        (WHERE pt.due_date < CURRENT_DATE AND pt.status != $2) AS overdue_tasks, \
                    COALESCE(SUM(pt.estimated_hours), 0) AS estimated_hours, \
                    COALESCE(SUM(pt.actual_hours), 0) AS actual_hours \
             FROM resource_allocations ra \
             JOIN users u ON ra.user_id = u.id \
             LEFT JOIN project_tasks pt \
                    ON u.id = pt.assigned_to AND pt.project_id = $1 \
             WHERE ra.project_id = $1 \
             GROUP BY u.id, u.name \
             ORDER BY u.name",
        )
        .bind(project_id)
        .bind(TASK_STATUS_COMPLETED)
        .fetch_all(pool)
        .await?;

        Ok(ProjectResourceAnalytics {
            allocation_summary,
            tasks_by_resource,
        })
    }

    /// Fleet-wide capacity planning report.
    pub async fn capacity(pool: &PgPool) -> Result<CapacityReport, sqlx::Error> {
        let overall_capacity = sqlx::query_as::<_, OverallCapacity>(
            "SELECT COUNT(DISTINCT u.id) AS total_users, \
                    COUNT(DISTINCT ra.user_id) AS allocated_users, \
                    SUM(ra.allocation_percentage) AS total_allocation, \
                    AVG(ra.allocation_percentage) AS avg_allocation \
             FROM users u \
             LEFT JOIN resource_allocations ra ON u.id = ra.user_id",
        )
        .fetch_one(pool)
        .await?;

        let capacity_by_role = sqlx::query_as::<_, RoleCapacity>(
            "SELECT u.role, \
                    COUNT(DISTINCT u.id) AS total_users, \
                    COUNT(ra.id) AS allocated_users, \
                    COALESCE(SUM(ra.allocation_percentage), 0) AS total_allocation, \
                    COALESCE(AVG(ra.allocation_percentage), 0) AS avg_allocation \
             FROM users u \
             LEFT JOIN resource_allocations ra ON u.id = ra.user_id \
             GROUP BY u.role \
             ORDER BY u.role",
        )
        .fetch_all(pool)
        .await?;

        let resource_availability = sqlx::query_as::<_, UserAvailability>(
            "SELECT u.id, u.name, u.role, \
                    COALESCE(SUM(ra.allocation_percentage), 0) AS total_allocation, \
                    100 - COALESCE(SUM(ra.allocation_percentage), 0) AS available_capacity \
             FROM users u \
             LEFT JOIN resource_allocations ra ON u.id = ra.user_id \
             GROUP BY u.id, u.name, u.role \
             ORDER BY available_capacity DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(CapacityReport {
            overall_capacity,
            capacity_by_role,
            resource_availability,
        })
    }
}
