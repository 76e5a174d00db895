//! Aggregate row types for the analytics and timeline-stats endpoints.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Count of rows sharing a label (status, priority, role, ...).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Count bucketed by calendar month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyCount {
    pub month: NaiveDate,
    pub count: i64,
}

/// Monthly upload volume (count + bytes).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyUploadVolume {
    pub month: NaiveDate,
    pub count: i64,
    pub total_size: Option<i64>,
}

/// Per-user activity counter (projects created, comments posted, ...).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserActivityCount {
    pub name: String,
    pub count: i64,
}

/// File counts and bytes grouped by coarse MIME category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileTypeBreakdown {
    pub category: String,
    pub count: i64,
    pub total_size: Option<i64>,
}

/// Project statistics response.
#[derive(Debug, Serialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub recent_projects: i64,
    pub by_status: Vec<LabelCount>,
    pub by_priority: Vec<LabelCount>,
    pub monthly_trend: Vec<MonthlyCount>,
}

/// User statistics response.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total_users: i64,
    pub recent_users: i64,
    pub by_role: Vec<LabelCount>,
    pub most_active: Vec<UserActivityCount>,
}

/// File statistics response.
#[derive(Debug, Serialize)]
pub struct FileStats {
    pub total_files: i64,
    pub total_size: i64,
    pub recent_uploads: i64,
    pub by_type: Vec<FileTypeBreakdown>,
    pub monthly_trend: Vec<MonthlyUploadVolume>,
}

/// Comment statistics response.
#[derive(Debug, Serialize)]
pub struct CommentStats {
    pub total_comments: i64,
    pub recent_comments: i64,
    pub most_active: Vec<UserActivityCount>,
    pub monthly_trend: Vec<MonthlyCount>,
}

/// Entity counts for the overview endpoint.
#[derive(Debug, Serialize)]
pub struct OverviewSummary {
    pub projects: i64,
    pub users: i64,
    pub files: i64,
    pub comments: i64,
}

/// Activity in the trailing week, per entity type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentActivityRow {
    pub entity: String,
    pub count: i64,
}

/// Projects ranked by attached files and comments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopProjectRow {
    pub name: String,
    pub file_count: i64,
    pub comment_count: i64,
}

/// Combined overview response.
#[derive(Debug, Serialize)]
pub struct SystemOverview {
    pub summary: OverviewSummary,
    pub recent_activity: Vec<RecentActivityRow>,
    pub top_projects: Vec<TopProjectRow>,
}

// ---------------------------------------------------------------------------
// Timeline statistics
// ---------------------------------------------------------------------------

/// A milestone or task due within the lookahead window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeadlineRow {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub due_date: NaiveDate,
    pub project_name: String,
}

/// A milestone or task past its due date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverdueRow {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub due_date: NaiveDate,
    pub project_name: String,
    pub days_overdue: i32,
}

/// A project whose progress changed recently.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentProgressRow {
    pub project_id: DbId,
    pub project_name: String,
    pub progress: i32,
    pub updated_at: Timestamp,
}

/// Timeline statistics response.
#[derive(Debug, Serialize)]
pub struct TimelineStats {
    pub upcoming_deadlines: Vec<DeadlineRow>,
    pub overdue_items: Vec<OverdueRow>,
    pub recent_progress: Vec<RecentProgressRow>,
}
