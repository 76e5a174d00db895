//! Repository for the `project_expenses` ledger and `expense_categories`.
//!
//! Every mutation that touches an expense amount also adjusts the owning
//! project's `actual_cost` and recomputes `budget_status`, inside a single
//! transaction that first locks the project row. The lock makes the
//! read-classify-write sequence atomic with respect to concurrent ledger
//! mutations on the same project.

use khelo_core::budget::{validate_expense, BudgetStatus};
use khelo_core::error::CoreError;
use khelo_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::expense::{
    BudgetAnalytics, BudgetComparison, BudgetOverallStats, BudgetOverview, BudgetStatusCount,
    CategoryBreakdown, CreateExpense, CreateExpenseCategory, Expense, ExpenseCategory,
    ExpenseFilter, ExpenseWithNames, MonthlyExpenseTrend, ProjectBudget, TopCategory,
    UpdateExpense,
};

/// Column list shared across expense queries.
const COLUMNS: &str = "id, project_id, description, amount, category, expense_date, \
    approved, approved_by, approved_at, submitted_by, receipt_url, notes, created_at";

/// Expense columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str = "pe.id, pe.project_id, pe.description, pe.amount, pe.category, \
    pe.expense_date, pe.approved, pe.approved_by, pe.approved_at, pe.submitted_by, \
    pe.receipt_url, pe.notes, pe.created_at";

/// Default category accent color.
const DEFAULT_CATEGORY_COLOR: &str = "#1976d2";

/// How many recent expenses the budget overview embeds.
const RECENT_EXPENSE_LIMIT: i64 = 10;

/// Project budget fields read under the ledger lock.
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: DbId,
    budget: Decimal,
    actual_cost: Decimal,
}

/// Provides ledger operations for project expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    // -----------------------------------------------------------------------
    // Ledger mutations
    // -----------------------------------------------------------------------

    /// Record a new expense against a project.
    ///
    /// Inserts the expense with `approved = false`, adds the amount to the
    /// project's `actual_cost`, and recomputes `budget_status`, atomically.
    pub async fn record(
        pool: &PgPool,
        input: &CreateExpense,
        submitted_by: DbId,
    ) -> Result<Expense, DbError> {
        validate_expense(input.amount, &input.description, &input.category)?;

        let mut tx = pool.begin().await?;

        let project = Self::lock_project(&mut tx, input.project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            })?;

        let insert = format!(
            "INSERT INTO project_expenses \
                (project_id, description, amount, category, expense_date, \
                 notes, receipt_url, submitted_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let expense = sqlx::query_as::<_, Expense>(&insert)
            .bind(input.project_id)
            .bind(&input.description)
            .bind(input.amount)
            .bind(&input.category)
            .bind(input.expense_date)
            .bind(&input.notes)
            .bind(&input.receipt_url)
            .bind(submitted_by)
            .fetch_one(&mut *tx)
            .await?;

        Self::apply_cost_delta(&mut tx, &project, input.amount).await?;

        tx.commit().await?;
        tracing::debug!(
            expense_id = expense.id,
            project_id = expense.project_id,
            amount = %expense.amount,
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Revise an expense, propagating the signed amount delta to the
    /// project's `actual_cost` (never the absolute new amount).
    pub async fn revise(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Expense, DbError> {
        validate_expense(input.amount, &input.description, &input.category)?;

        let mut tx = pool.begin().await?;

        // Lock the expense first, then the project. All ledger paths take
        // locks in this order, so concurrent revisions serialize cleanly.
        let current: Option<(DbId, Decimal)> = sqlx::query_as(
            "SELECT project_id, amount FROM project_expenses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let (project_id, old_amount) = current.ok_or(CoreError::NotFound {
            entity: "Expense",
            id,
        })?;

        let project = Self::lock_project(&mut tx, project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        let update = format!(
            "UPDATE project_expenses \
             SET description = $2, amount = $3, category = $4, expense_date = $5, \
                 notes = $6, receipt_url = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let expense = sqlx::query_as::<_, Expense>(&update)
            .bind(id)
            .bind(&input.description)
            .bind(input.amount)
            .bind(&input.category)
            .bind(input.expense_date)
            .bind(&input.notes)
            .bind(&input.receipt_url)
            .fetch_one(&mut *tx)
            .await?;

        Self::apply_cost_delta(&mut tx, &project, input.amount - old_amount).await?;

        tx.commit().await?;
        Ok(expense)
    }

    /// Delete an expense, subtracting its amount back out of the project's
    /// `actual_cost`.
    pub async fn remove(pool: &PgPool, id: DbId) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;

        let current: Option<(DbId, Decimal)> = sqlx::query_as(
            "SELECT project_id, amount FROM project_expenses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let (project_id, amount) = current.ok_or(CoreError::NotFound {
            entity: "Expense",
            id,
        })?;

        let project = Self::lock_project(&mut tx, project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        sqlx::query("DELETE FROM project_expenses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::apply_cost_delta(&mut tx, &project, -amount).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Stamp the approval flag on an expense.
    ///
    /// Approval is a workflow flag only: `actual_cost` reflects all
    /// expenses from the moment they are submitted, approved or not.
    pub async fn set_approval(
        pool: &PgPool,
        id: DbId,
        approved: bool,
        approver: DbId,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE project_expenses \
             SET approved = $2, approved_by = $3, approved_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(approved)
            .bind(approver)
            .fetch_optional(pool)
            .await
    }

    /// Lock the project row for the duration of a ledger transaction.
    async fn lock_project(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<Option<LedgerRow>, sqlx::Error> {
        sqlx::query_as::<_, LedgerRow>(
            "SELECT id, budget, actual_cost FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(project_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Apply a signed cost delta to a locked project and store the freshly
    /// classified budget status.
    async fn apply_cost_delta(
        tx: &mut Transaction<'_, Postgres>,
        project: &LedgerRow,
        delta: Decimal,
    ) -> Result<(), sqlx::Error> {
        let new_actual = project.actual_cost + delta;
        let status = BudgetStatus::classify(project.budget, new_actual);

        sqlx::query(
            "UPDATE projects \
             SET actual_cost = $2, budget_status = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(project.id)
        .bind(new_actual)
        .bind(status.as_str())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// List a project's expenses with submitter/approver names, newest
    /// first, honoring the optional filters.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseWithNames>, sqlx::Error> {
        let approved_filter = match filter.status.as_deref() {
            Some("approved") => Some(true),
            Some("pending") => Some(false),
            _ => None,
        };

        let query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    u.name AS submitted_by_name, au.name AS approved_by_name \
             FROM project_expenses pe \
             LEFT JOIN users u ON pe.submitted_by = u.id \
             LEFT JOIN users au ON pe.approved_by = au.id \
             WHERE pe.project_id = $1 \
               AND ($2::VARCHAR IS NULL OR pe.category = $2) \
               AND ($3::BOOLEAN IS NULL OR pe.approved = $3) \
               AND ($4::DATE IS NULL OR pe.expense_date >= $4) \
               AND ($5::DATE IS NULL OR pe.expense_date <= $5) \
             ORDER BY pe.created_at DESC"
        );
        sqlx::query_as::<_, ExpenseWithNames>(&query)
            .bind(project_id)
            .bind(&filter.category)
            .bind(approved_filter)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .fetch_all(pool)
            .await
    }

    /// Assemble the budget overview for a project.
    ///
    /// Returns `None` if the project does not exist.
    pub async fn overview(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<BudgetOverview>, sqlx::Error> {
        let project: Option<LedgerRowWithStatus> = sqlx::query_as(
            "SELECT id, name, budget, actual_cost, budget_status \
             FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;
        let Some(project) = project else {
            return Ok(None);
        };

        let expenses_by_category = sqlx::query_as::<_, CategoryBreakdown>(
            "SELECT category, COUNT(*) AS count, \
                    SUM(amount) AS total_amount, AVG(amount) AS avg_amount \
             FROM project_expenses \
             WHERE project_id = $1 \
             GROUP BY category \
             ORDER BY total_amount DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let recent_query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    u.name AS submitted_by_name, au.name AS approved_by_name \
             FROM project_expenses pe \
             LEFT JOIN users u ON pe.submitted_by = u.id \
             LEFT JOIN users au ON pe.approved_by = au.id \
             WHERE pe.project_id = $1 \
             ORDER BY pe.created_at DESC \
             LIMIT $2"
        );
        let recent_expenses = sqlx::query_as::<_, ExpenseWithNames>(&recent_query)
            .bind(project_id)
            .bind(RECENT_EXPENSE_LIMIT)
            .fetch_all(pool)
            .await?;

        let budget_comparison = sqlx::query_as::<_, BudgetComparison>(
            "SELECT SUM(amount) FILTER (WHERE approved) AS approved_expenses, \
                    SUM(amount) FILTER (WHERE NOT approved) AS pending_expenses, \
                    COUNT(*) AS total_expenses, \
                    COUNT(*) FILTER (WHERE approved) AS approved_count \
             FROM project_expenses \
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        let utilization = if project.budget > Decimal::ZERO {
            project.actual_cost / project.budget * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        Ok(Some(BudgetOverview {
            project: ProjectBudget {
                id: project.id,
                name: project.name,
                remaining_budget: project.budget - project.actual_cost,
                budget_utilization: utilization,
                budget: project.budget,
                actual_cost: project.actual_cost,
                budget_status: project.budget_status,
            },
            expenses_by_category,
            recent_expenses,
            budget_comparison,
        }))
    }

    /// Fleet-wide budget analytics.
    pub async fn analytics(pool: &PgPool) -> Result<BudgetAnalytics, sqlx::Error> {
        let overall_stats = sqlx::query_as::<_, BudgetOverallStats>(
            "SELECT COUNT(*) AS total_projects, SUM(budget) AS total_budget, \
                    SUM(actual_cost) AS total_actual_cost, \
                    AVG(budget) AS avg_budget, AVG(actual_cost) AS avg_actual_cost \
             FROM projects WHERE budget > 0",
        )
        .fetch_one(pool)
        .await?;

        let budget_status = sqlx::query_as::<_, BudgetStatusCount>(
            "SELECT budget_status, COUNT(*) AS count, \
                    SUM(budget) AS total_budget, SUM(actual_cost) AS total_actual_cost \
             FROM projects WHERE budget > 0 \
             GROUP BY budget_status",
        )
        .fetch_all(pool)
        .await?;

        let monthly_trends = sqlx::query_as::<_, MonthlyExpenseTrend>(
            "SELECT DATE_TRUNC('month', expense_date)::DATE AS month, \
                    COUNT(*) AS expense_count, SUM(amount) AS total_amount \
             FROM project_expenses \
             WHERE expense_date >= CURRENT_DATE - INTERVAL '12 months' \
             GROUP BY DATE_TRUNC('month', expense_date) \
             ORDER BY month DESC",
        )
        .fetch_all(pool)
        .await?;

        let top_categories = sqlx::query_as::<_, TopCategory>(
            "SELECT category, COUNT(*) AS expense_count, SUM(amount) AS total_amount \
             FROM project_expenses \
             GROUP BY category \
             ORDER BY total_amount DESC \
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;

        Ok(BudgetAnalytics {
            overall_stats,
            budget_status,
            monthly_trends,
            top_categories,
        })
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// List all expense categories by name.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<ExpenseCategory>, sqlx::Error> {
        sqlx::query_as::<_, ExpenseCategory>(
            "SELECT id, name, description, color, created_at \
             FROM expense_categories ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Create a new expense category.
    pub async fn create_category(
        pool: &PgPool,
        input: &CreateExpenseCategory,
    ) -> Result<ExpenseCategory, sqlx::Error> {
        sqlx::query_as::<_, ExpenseCategory>(
            "INSERT INTO expense_categories (name, description, color) \
             VALUES ($1, $2, COALESCE($3, $4)) \
             RETURNING id, name, description, color, created_at",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.color)
        .bind(DEFAULT_CATEGORY_COLOR)
        .fetch_one(pool)
        .await
    }
}

/// Project budget fields plus the stored status, for the overview read.
#[derive(Debug, sqlx::FromRow)]
struct LedgerRowWithStatus {
    id: DbId,
    name: String,
    budget: Decimal,
    actual_cost: Decimal,
    budget_status: String,
}
