//! Repository for the `project_milestones` table.

use khelo_core::error::CoreError;
use khelo_core::status::MilestoneStatus;
use khelo_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::milestone::{
    CreateMilestone, Milestone, MilestoneWithTaskCounts, UpdateMilestone,
};

/// Column list shared across milestone queries.
const COLUMNS: &str = "id, project_id, name, description, due_date, completed_date, \
    status, order_index, created_at";

/// Milestone columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str = "m.id, m.project_id, m.name, m.description, m.due_date, \
    m.completed_date, m.status, m.order_index, m.created_at";

/// Provides CRUD operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a new milestone.
    pub async fn create(pool: &PgPool, input: &CreateMilestone) -> Result<Milestone, DbError> {
        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(input.project_id)
                .fetch_optional(pool)
                .await?;
        if project_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO project_milestones \
                (project_id, name, description, due_date, order_index) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0)) \
             RETURNING {COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.order_index)
            .fetch_one(pool)
            .await?;
        Ok(milestone)
    }

    /// Update a milestone in place.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Milestone, DbError> {
        let status = MilestoneStatus::from_str(&input.status)?;

        let query = format!(
            "UPDATE project_milestones \
             SET name = $2, description = $3, due_date = $4, status = $5, \
                 completed_date = $6, order_index = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(status.as_str())
            .bind(input.completed_date)
            .bind(input.order_index)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Milestone",
                    id,
                }
                .into()
            })
    }

    /// Delete a milestone. Tasks pointing at it fall back to unassigned.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a project's milestones with task rollups, in timeline order.
    pub async fn list_with_task_counts(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MilestoneWithTaskCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    COUNT(t.id) AS task_count, \
                    COUNT(t.id) FILTER (WHERE t.status = $2) AS completed_tasks \
             FROM project_milestones m \
             LEFT JOIN project_tasks t ON m.id = t.milestone_id \
             WHERE m.project_id = $1 \
             GROUP BY m.id \
             ORDER BY m.order_index, m.due_date"
        );
        sqlx::query_as::<_, MilestoneWithTaskCounts>(&query)
            .bind(project_id)
            .bind(khelo_core::status::TASK_STATUS_COMPLETED)
            .fetch_all(pool)
            .await
    }
}
