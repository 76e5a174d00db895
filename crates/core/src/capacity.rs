//! Resource allocation capacity rule.
//!
//! A user's committed capacity is the sum of `allocation_percentage` over
//! all of their allocation rows, across every project. The sum may never
//! exceed [`MAX_TOTAL_ALLOCATION`]. The ceiling is a hard business rule,
//! not configurable.

use crate::error::CoreError;

/// Hard ceiling on a user's total allocation percentage across all projects.
pub const MAX_TOTAL_ALLOCATION: i32 = 100;

/// Validate a single allocation percentage value (0..=100).
pub fn validate_percentage(percentage: i32) -> Result<(), CoreError> {
    if !(0..=MAX_TOTAL_ALLOCATION).contains(&percentage) {
        return Err(CoreError::Validation(format!(
            "Allocation percentage must be between 0 and {MAX_TOTAL_ALLOCATION}, got {percentage}"
        )));
    }
    Ok(())
}

/// Check that adding `requested` to a user's current committed total stays
/// within the ceiling.
///
/// `current_total` must already exclude the row being updated when checking
/// a reallocation.
pub fn check_capacity(current_total: i64, requested: i32) -> Result<(), CoreError> {
    if current_total + i64::from(requested) > i64::from(MAX_TOTAL_ALLOCATION) {
        return Err(CoreError::CapacityExceeded {
            current: current_total as i32,
            requested,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(100).is_ok());
        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(101).is_err());
    }

    #[test]
    fn test_capacity_rejects_overcommit() {
        // User at 60% across existing projects; 50% more would be 110%.
        let err = check_capacity(60, 50).unwrap_err();
        assert_matches!(
            err,
            CoreError::CapacityExceeded {
                current: 60,
                requested: 50
            }
        );
    }

    #[test]
    fn test_capacity_accepts_exact_fill() {
        // 60% + 40% lands exactly on the ceiling.
        assert!(check_capacity(60, 40).is_ok());
    }

    #[test]
    fn test_capacity_recovers_after_deallocation() {
        // Freeing 60% makes the same 60% allocatable again.
        assert!(check_capacity(0, 60).is_ok());
    }

    #[test]
    fn test_capacity_error_message_names_both_values() {
        let err = check_capacity(70, 45).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Current: 70%"));
        assert!(msg.contains("Requested: 45%"));
    }
}
