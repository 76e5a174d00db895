//! Repository for the `projects` table.

use khelo_core::budget::BudgetStatus;
use khelo_core::error::CoreError;
use khelo_core::status::{Priority, ProjectStatus, PROJECT_STATUS_PLANNING};
use khelo_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::project::{CreateProject, Project, ProjectWithCreator, UpdateProject};

/// Column list shared across project queries.
const COLUMNS: &str = "id, name, description, scope, status, priority, tags, \
    start_date, end_date, actual_start_date, actual_end_date, progress, \
    budget, actual_cost, budget_status, created_by, created_at, updated_at";

/// Project columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.scope, p.status, p.priority, \
    p.tags, p.start_date, p.end_date, p.actual_start_date, p.actual_end_date, p.progress, \
    p.budget, p.actual_cost, p.budget_status, p.created_by, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// The initial `budget_status` is classified against a zero actual
    /// cost, so a project with a positive budget starts Under Budget.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: DbId,
    ) -> Result<Project, DbError> {
        let status = match &input.status {
            Some(s) => ProjectStatus::from_str(s)?.as_str(),
            None => PROJECT_STATUS_PLANNING,
        };
        let priority = match &input.priority {
            Some(p) => Priority::from_str(p)?.as_str(),
            None => Priority::Medium.as_str(),
        };

        let budget = input.budget.unwrap_or(Decimal::ZERO);
        if budget < Decimal::ZERO {
            return Err(CoreError::Validation("Project budget cannot be negative".into()).into());
        }
        let budget_status = BudgetStatus::classify(budget, Decimal::ZERO);

        let insert = format!(
            "INSERT INTO projects \
                (name, description, scope, status, priority, tags, \
                 start_date, end_date, budget, budget_status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&insert)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.scope)
            .bind(status)
            .bind(priority)
            .bind(&input.tags)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(budget)
            .bind(budget_status.as_str())
            .bind(created_by)
            .fetch_one(pool)
            .await?;

        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects with creator names, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectWithCreator>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, u.name AS created_by_name \
             FROM projects p \
             LEFT JOIN users u ON p.created_by = u.id \
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithCreator>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Changing the budget reclassifies `budget_status` against the stored
    /// `actual_cost` inside the same transaction as the write, under a row
    /// lock so a concurrent ledger mutation cannot interleave.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Project, DbError> {
        if let Some(status) = &input.status {
            ProjectStatus::from_str(status)?;
        }
        if let Some(priority) = &input.priority {
            Priority::from_str(priority)?;
        }
        if let Some(budget) = input.budget {
            if budget < Decimal::ZERO {
                return Err(
                    CoreError::Validation("Project budget cannot be negative".into()).into(),
                );
            }
        }

        let mut tx = pool.begin().await?;

        let current: Option<(Decimal, Decimal)> = sqlx::query_as(
            "SELECT budget, actual_cost FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let (old_budget, actual_cost) = current.ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;

        let new_budget = input.budget.unwrap_or(old_budget);
        let budget_status = BudgetStatus::classify(new_budget, actual_cost);

        let update = format!(
            "UPDATE projects SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                scope = COALESCE($4, scope), \
                status = COALESCE($5, status), \
                priority = COALESCE($6, priority), \
                tags = COALESCE($7, tags), \
                start_date = COALESCE($8, start_date), \
                end_date = COALESCE($9, end_date), \
                actual_start_date = COALESCE($10, actual_start_date), \
                actual_end_date = COALESCE($11, actual_end_date), \
                budget = $12, \
                budget_status = $13, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&update)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.scope)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(&input.tags)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.actual_start_date)
            .bind(input.actual_end_date)
            .bind(new_budget)
            .bind(budget_status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Permanently delete a project. Dependent rows cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
