//! Budget-status classification and expense input validation.
//!
//! `projects.actual_cost` reflects the sum of all recorded expenses,
//! approved or not; budget exposure is tracked at submission time.
//! `projects.budget_status` is a pure function of the budget ceiling and
//! the running actual cost, recomputed by the persistence layer inside the
//! same transaction as every `actual_cost` mutation.

use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Budget status
// ---------------------------------------------------------------------------

pub const BUDGET_STATUS_UNDER: &str = "Under Budget";
pub const BUDGET_STATUS_ON: &str = "On Budget";
pub const BUDGET_STATUS_OVER: &str = "Over Budget";

/// Derived three-valued classification of a project's spend relative to its
/// budget ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BudgetStatus {
    Under,
    On,
    Over,
}

impl BudgetStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under => BUDGET_STATUS_UNDER,
            Self::On => BUDGET_STATUS_ON,
            Self::Over => BUDGET_STATUS_OVER,
        }
    }

    /// Classify spend against the budget ceiling.
    ///
    /// Over if `actual_cost > budget`, On if equal, Under otherwise.
    pub fn classify(budget: Decimal, actual_cost: Decimal) -> Self {
        if actual_cost > budget {
            Self::Over
        } else if actual_cost == budget {
            Self::On
        } else {
            Self::Under
        }
    }
}

// ---------------------------------------------------------------------------
// Expense validation
// ---------------------------------------------------------------------------

/// Validate the required fields of an expense submission.
///
/// The expense date is enforced structurally (a typed `NaiveDate` request
/// field); the remaining rules live here.
pub fn validate_expense(
    amount: Decimal,
    description: &str,
    category: &str,
) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Expense amount must be greater than zero".into(),
        ));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Expense description is required".into(),
        ));
    }
    if category.trim().is_empty() {
        return Err(CoreError::Validation("Expense category is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_classify_under_on_over() {
        let budget = Decimal::from(1000);
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::ZERO),
            BudgetStatus::Under
        );
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::from(1000)),
            BudgetStatus::On
        );
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::from(1001)),
            BudgetStatus::Over
        );
    }

    #[test]
    fn test_classify_with_fractional_amounts() {
        let budget = Decimal::new(100050, 2); // 1000.50
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::new(100049, 2)),
            BudgetStatus::Under
        );
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::new(100050, 2)),
            BudgetStatus::On
        );
        assert_eq!(
            BudgetStatus::classify(budget, Decimal::new(100051, 2)),
            BudgetStatus::Over
        );
    }

    #[test]
    fn test_classify_zero_budget_zero_spend_is_on_budget() {
        assert_eq!(
            BudgetStatus::classify(Decimal::ZERO, Decimal::ZERO),
            BudgetStatus::On
        );
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(BudgetStatus::Under.as_str(), "Under Budget");
        assert_eq!(BudgetStatus::On.as_str(), "On Budget");
        assert_eq!(BudgetStatus::Over.as_str(), "Over Budget");
    }

    #[test]
    fn test_validate_expense_accepts_valid_input() {
        assert!(validate_expense(Decimal::from(50), "Team jerseys", "Equipment").is_ok());
    }

    #[test]
    fn test_validate_expense_rejects_non_positive_amount() {
        let err = validate_expense(Decimal::ZERO, "Jerseys", "Equipment").unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert!(validate_expense(Decimal::from(-5), "Jerseys", "Equipment").is_err());
    }

    #[test]
    fn test_validate_expense_rejects_blank_fields() {
        assert!(validate_expense(Decimal::from(10), "  ", "Equipment").is_err());
        assert!(validate_expense(Decimal::from(10), "Jerseys", "").is_err());
    }
}
