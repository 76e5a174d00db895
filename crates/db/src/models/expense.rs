//! Expense and expense-category models and DTOs, plus the aggregate row
//! types backing the budget overview and analytics endpoints.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub expense_date: NaiveDate,
    pub approved: bool,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub submitted_by: Option<DbId>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Expense row joined with submitter and approver display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpenseWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub expense: Expense,
    pub submitted_by_name: Option<String>,
    pub approved_by_name: Option<String>,
}

/// DTO for recording a new expense.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExpense {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 500, message = "Expense description is required"))]
    pub description: String,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 100, message = "Expense category is required"))]
    pub category: String,
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
}

/// DTO for revising an existing expense.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExpense {
    #[validate(length(min = 1, max = 500, message = "Expense description is required"))]
    pub description: String,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 100, message = "Expense category is required"))]
    pub category: String,
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
}

/// Query filters for listing a project's expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    /// `approved` or `pending`; anything else is ignored.
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// A row from the `expense_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpenseCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: Timestamp,
}

/// DTO for creating an expense category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExpenseCategory {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the standard accent color if omitted.
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Budget overview / analytics aggregates
// ---------------------------------------------------------------------------

/// Per-category expense aggregate for a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: i64,
    pub total_amount: Option<Decimal>,
    pub avg_amount: Option<Decimal>,
}

/// Approved/pending split for a project's expenses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BudgetComparison {
    pub approved_expenses: Option<Decimal>,
    pub pending_expenses: Option<Decimal>,
    pub total_expenses: i64,
    pub approved_count: i64,
}

/// The project slice of the budget overview response.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectBudget {
    pub id: DbId,
    pub name: String,
    pub budget: Decimal,
    pub actual_cost: Decimal,
    pub budget_status: String,
    pub remaining_budget: Decimal,
    /// Spend as a percentage of budget; 0 when the budget is 0.
    pub budget_utilization: Decimal,
}

/// Full budget overview for a project.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    pub project: ProjectBudget,
    pub expenses_by_category: Vec<CategoryBreakdown>,
    pub recent_expenses: Vec<ExpenseWithNames>,
    pub budget_comparison: BudgetComparison,
}

/// Fleet-wide budget statistics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BudgetOverallStats {
    pub total_projects: i64,
    pub total_budget: Option<Decimal>,
    pub total_actual_cost: Option<Decimal>,
    pub avg_budget: Option<Decimal>,
    pub avg_actual_cost: Option<Decimal>,
}

/// Project counts grouped by budget status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BudgetStatusCount {
    pub budget_status: String,
    pub count: i64,
    pub total_budget: Option<Decimal>,
    pub total_actual_cost: Option<Decimal>,
}

/// Monthly expense totals for trend charts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyExpenseTrend {
    pub month: NaiveDate,
    pub expense_count: i64,
    pub total_amount: Option<Decimal>,
}

/// Top spending categories across all projects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopCategory {
    pub category: String,
    pub expense_count: i64,
    pub total_amount: Option<Decimal>,
}

/// Full budget analytics response.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetAnalytics {
    pub overall_stats: BudgetOverallStats,
    pub budget_status: Vec<BudgetStatusCount>,
    pub monthly_trends: Vec<MonthlyExpenseTrend>,
    pub top_categories: Vec<TopCategory>,
}
