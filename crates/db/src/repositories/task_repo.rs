//! Repository for `project_tasks` and `task_dependencies`.
//!
//! Task writes recompute the owning project's `progress` inside the same
//! transaction, keeping the derived field consistent with task state at
//! every commit. The standalone recompute is also exposed for the explicit
//! update-progress endpoint.

use khelo_core::error::CoreError;
use khelo_core::progress::completion_percentage;
use khelo_core::status::{Priority, TaskStatus, TASK_STATUS_COMPLETED, TASK_STATUS_TO_DO};
use khelo_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::task::{
    CreateTask, CreateTaskDependency, ProgressSnapshot, Task, TaskDependency,
    TaskDependencyWithName, TaskWithNames, UpdateTask,
};

/// Column list shared across task queries.
const COLUMNS: &str = "id, project_id, milestone_id, name, description, status, priority, \
    assigned_to, due_date, completed_date, estimated_hours, actual_hours, \
    estimated_cost, actual_cost, order_index, created_by, created_at, updated_at";

/// Task columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str = "t.id, t.project_id, t.milestone_id, t.name, t.description, \
    t.status, t.priority, t.assigned_to, t.due_date, t.completed_date, t.estimated_hours, \
    t.actual_hours, t.estimated_cost, t.actual_cost, t.order_index, t.created_by, \
    t.created_at, t.updated_at";

/// Default dependency type.
const DEFAULT_DEPENDENCY_TYPE: &str = "Finish-to-Start";

/// Provides CRUD operations for tasks, keeping project progress current.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task and refresh the project's progress.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        created_by: DbId,
    ) -> Result<Task, DbError> {
        let status = match &input.status {
            Some(s) => TaskStatus::from_str(s)?.as_str(),
            None => TASK_STATUS_TO_DO,
        };
        let priority = match &input.priority {
            Some(p) => Priority::from_str(p)?.as_str(),
            None => Priority::Medium.as_str(),
        };

        let mut tx = pool.begin().await?;

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

        let insert = format!(
            "INSERT INTO project_tasks \
                (project_id, milestone_id, name, description, status, priority, \
                 assigned_to, due_date, estimated_hours, order_index, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 0), $11) \
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&insert)
            .bind(input.project_id)
            .bind(input.milestone_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(status)
            .bind(priority)
            .bind(input.assigned_to)
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(input.order_index)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        Self::recompute_progress(&mut tx, input.project_id).await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Update a task and refresh the project's progress.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTask) -> Result<Task, DbError> {
        let status = TaskStatus::from_str(&input.status)?;
        let priority = Priority::from_str(&input.priority)?;

        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE project_tasks \
             SET name = $2, description = $3, status = $4, priority = $5, \
                 assigned_to = $6, due_date = $7, completed_date = $8, \
                 estimated_hours = $9, actual_hours = $10, order_index = $11, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&update)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(status.as_str())
            .bind(priority.as_str())
            .bind(input.assigned_to)
            .bind(input.due_date)
            .bind(input.completed_date)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.order_index)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound { entity: "Task", id })?;

        Self::recompute_progress(&mut tx, task.project_id).await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Delete a task and refresh the project's progress.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId,)> =
            sqlx::query_as("DELETE FROM project_tasks WHERE id = $1 RETURNING project_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (project_id,) = deleted.ok_or(CoreError::NotFound { entity: "Task", id })?;

        Self::recompute_progress(&mut tx, project_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Recompute and store a project's progress from its current task set.
    ///
    /// Returns `None` if the project does not exist. Backs the explicit
    /// update-progress endpoint.
    pub async fn recalculate_progress(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProgressSnapshot>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if project_exists.is_none() {
            return Ok(None);
        }

        let snapshot = Self::recompute_progress(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(Some(snapshot))
    }

    /// Count completed/total tasks and write the derived percentage back to
    /// the project row.
    async fn recompute_progress(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<ProgressSnapshot, sqlx::Error> {
        let (total_tasks, completed_tasks): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $2) \
             FROM project_tasks WHERE project_id = $1",
        )
        .bind(project_id)
        .bind(TASK_STATUS_COMPLETED)
        .fetch_one(&mut **tx)
        .await?;

        let progress = completion_percentage(completed_tasks, total_tasks);

        sqlx::query("UPDATE projects SET progress = $2, updated_at = NOW() WHERE id = $1")
            .bind(project_id)
            .bind(progress)
            .execute(&mut **tx)
            .await?;

        Ok(ProgressSnapshot {
            progress,
            total_tasks,
            completed_tasks,
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// List a project's tasks with assignee and milestone names, in
    /// timeline order.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskWithNames>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    u.name AS assigned_to_name, m.name AS milestone_name \
             FROM project_tasks t \
             LEFT JOIN users u ON t.assigned_to = u.id \
             LEFT JOIN project_milestones m ON t.milestone_id = m.id \
             WHERE t.project_id = $1 \
             ORDER BY t.order_index, t.due_date"
        );
        sqlx::query_as::<_, TaskWithNames>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Dependencies
    // -----------------------------------------------------------------------

    /// Add a dependency edge between two tasks.
    ///
    /// A duplicate pair trips the `uq_task_dependencies_pair` constraint,
    /// which the API layer reports as a conflict.
    pub async fn add_dependency(
        pool: &PgPool,
        task_id: DbId,
        input: &CreateTaskDependency,
    ) -> Result<TaskDependency, DbError> {
        let task_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM project_tasks WHERE id = $1")
                .bind(task_id)
                .fetch_optional(pool)
                .await?;
        if task_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            }
            .into());
        }

        let dependency = sqlx::query_as::<_, TaskDependency>(
            "INSERT INTO task_dependencies (task_id, depends_on_task_id, dependency_type) \
             VALUES ($1, $2, COALESCE($3, $4)) \
             RETURNING id, task_id, depends_on_task_id, dependency_type, created_at",
        )
        .bind(task_id)
        .bind(input.depends_on_task_id)
        .bind(&input.dependency_type)
        .bind(DEFAULT_DEPENDENCY_TYPE)
        .fetch_one(pool)
        .await?;

        Ok(dependency)
    }

    /// Remove a dependency edge. Returns `true` if a row was deleted.
    pub async fn remove_dependency(
        pool: &PgPool,
        task_id: DbId,
        dependency_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM task_dependencies WHERE id = $1 AND task_id = $2")
                .bind(dependency_id)
                .bind(task_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all dependency edges whose dependent task belongs to a project.
    pub async fn dependencies_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskDependencyWithName>, sqlx::Error> {
        sqlx::query_as::<_, TaskDependencyWithName>(
            "SELECT td.id, td.task_id, td.depends_on_task_id, td.dependency_type, \
                    td.created_at, t.name AS depends_on_task_name \
             FROM task_dependencies td \
             JOIN project_tasks t ON td.depends_on_task_id = t.id \
             WHERE td.task_id IN (SELECT id FROM project_tasks WHERE project_id = $1)",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
