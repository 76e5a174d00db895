//! Canonical status and priority vocabularies.
//!
//! The status strings stored in the database are exactly the `as_str`
//! values below; every write path validates incoming strings through the
//! `from_str` constructors. Task completion is counted against the single
//! canonical [`TaskStatus::Completed`] value.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

pub const PROJECT_STATUS_PLANNING: &str = "Planning";
pub const PROJECT_STATUS_ACTIVE: &str = "Active";
pub const PROJECT_STATUS_ON_HOLD: &str = "On Hold";
pub const PROJECT_STATUS_COMPLETED: &str = "Completed";
pub const PROJECT_STATUS_CANCELLED: &str = "Cancelled";

/// All valid project statuses.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_PLANNING,
    PROJECT_STATUS_ACTIVE,
    PROJECT_STATUS_ON_HOLD,
    PROJECT_STATUS_COMPLETED,
    PROJECT_STATUS_CANCELLED,
];

/// Project lifecycle status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => PROJECT_STATUS_PLANNING,
            Self::Active => PROJECT_STATUS_ACTIVE,
            Self::OnHold => PROJECT_STATUS_ON_HOLD,
            Self::Completed => PROJECT_STATUS_COMPLETED,
            Self::Cancelled => PROJECT_STATUS_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PROJECT_STATUS_PLANNING => Ok(Self::Planning),
            PROJECT_STATUS_ACTIVE => Ok(Self::Active),
            PROJECT_STATUS_ON_HOLD => Ok(Self::OnHold),
            PROJECT_STATUS_COMPLETED => Ok(Self::Completed),
            PROJECT_STATUS_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown project status: '{other}'. Valid statuses: {}",
                VALID_PROJECT_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority (shared by projects and tasks)
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "Low";
pub const PRIORITY_MEDIUM: &str = "Medium";
pub const PRIORITY_HIGH: &str = "High";
pub const PRIORITY_CRITICAL: &str = "Critical";

/// All valid priorities.
pub const VALID_PRIORITIES: &[&str] = &[
    PRIORITY_LOW,
    PRIORITY_MEDIUM,
    PRIORITY_HIGH,
    PRIORITY_CRITICAL,
];

/// Priority level with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => PRIORITY_LOW,
            Self::Medium => PRIORITY_MEDIUM,
            Self::High => PRIORITY_HIGH,
            Self::Critical => PRIORITY_CRITICAL,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PRIORITY_LOW => Ok(Self::Low),
            PRIORITY_MEDIUM => Ok(Self::Medium),
            PRIORITY_HIGH => Ok(Self::High),
            PRIORITY_CRITICAL => Ok(Self::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown priority: '{other}'. Valid priorities: {}",
                VALID_PRIORITIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Task status
// ---------------------------------------------------------------------------

pub const TASK_STATUS_TO_DO: &str = "To Do";
pub const TASK_STATUS_IN_PROGRESS: &str = "In Progress";
pub const TASK_STATUS_REVIEW: &str = "Review";
pub const TASK_STATUS_COMPLETED: &str = "Completed";
pub const TASK_STATUS_CANCELLED: &str = "Cancelled";

/// All valid task statuses.
pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_STATUS_TO_DO,
    TASK_STATUS_IN_PROGRESS,
    TASK_STATUS_REVIEW,
    TASK_STATUS_COMPLETED,
    TASK_STATUS_CANCELLED,
];

/// Task workflow status with string conversion.
///
/// [`TaskStatus::Completed`] is the only status counted as finished by
/// progress recomputation and workload rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => TASK_STATUS_TO_DO,
            Self::InProgress => TASK_STATUS_IN_PROGRESS,
            Self::Review => TASK_STATUS_REVIEW,
            Self::Completed => TASK_STATUS_COMPLETED,
            Self::Cancelled => TASK_STATUS_CANCELLED,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TASK_STATUS_TO_DO => Ok(Self::ToDo),
            TASK_STATUS_IN_PROGRESS => Ok(Self::InProgress),
            TASK_STATUS_REVIEW => Ok(Self::Review),
            TASK_STATUS_COMPLETED => Ok(Self::Completed),
            TASK_STATUS_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown task status: '{other}'. Valid statuses: {}",
                VALID_TASK_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether this status counts as finished.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ---------------------------------------------------------------------------
// Milestone status
// ---------------------------------------------------------------------------

pub const MILESTONE_STATUS_PENDING: &str = "Pending";
pub const MILESTONE_STATUS_COMPLETED: &str = "Completed";
pub const MILESTONE_STATUS_OVERDUE: &str = "Overdue";

/// All valid milestone statuses.
pub const VALID_MILESTONE_STATUSES: &[&str] = &[
    MILESTONE_STATUS_PENDING,
    MILESTONE_STATUS_COMPLETED,
    MILESTONE_STATUS_OVERDUE,
];

/// Milestone status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneStatus {
    Pending,
    Completed,
    Overdue,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => MILESTONE_STATUS_PENDING,
            Self::Completed => MILESTONE_STATUS_COMPLETED,
            Self::Overdue => MILESTONE_STATUS_OVERDUE,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            MILESTONE_STATUS_PENDING => Ok(Self::Pending),
            MILESTONE_STATUS_COMPLETED => Ok(Self::Completed),
            MILESTONE_STATUS_OVERDUE => Ok(Self::Overdue),
            other => Err(CoreError::Validation(format!(
                "Unknown milestone status: '{other}'. Valid statuses: {}",
                VALID_MILESTONE_STATUSES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_project_status_round_trip() {
        for s in VALID_PROJECT_STATUSES {
            assert_eq!(ProjectStatus::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn test_unknown_project_status_rejected() {
        let err = ProjectStatus::from_str("Archived").unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn test_task_status_round_trip() {
        for s in VALID_TASK_STATUSES {
            assert_eq!(TaskStatus::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn test_only_completed_counts_as_finished() {
        assert!(TaskStatus::Completed.is_finished());
        assert!(!TaskStatus::ToDo.is_finished());
        assert!(!TaskStatus::InProgress.is_finished());
        assert!(!TaskStatus::Review.is_finished());
        assert!(!TaskStatus::Cancelled.is_finished());
    }

    #[test]
    fn test_legacy_done_is_not_a_valid_status() {
        // Legacy rows are normalized by migration; the API never accepts it.
        assert!(TaskStatus::from_str("Done").is_err());
    }

    #[test]
    fn test_priority_round_trip() {
        for p in VALID_PRIORITIES {
            assert_eq!(Priority::from_str(p).unwrap().as_str(), *p);
        }
        assert!(Priority::from_str("Urgent").is_err());
    }

    #[test]
    fn test_milestone_status_round_trip() {
        for s in VALID_MILESTONE_STATUSES {
            assert_eq!(MilestoneStatus::from_str(s).unwrap().as_str(), *s);
        }
    }
}
