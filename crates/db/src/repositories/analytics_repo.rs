//! Repository for the analytics and timeline-statistics views.
//!
//! Read-only aggregate queries; nothing here mutates state.

use khelo_core::status::{MILESTONE_STATUS_COMPLETED, TASK_STATUS_CANCELLED, TASK_STATUS_COMPLETED};
use sqlx::PgPool;

use crate::models::analytics::{
    CommentStats, DeadlineRow, FileStats, FileTypeBreakdown, LabelCount, MonthlyCount,
    MonthlyUploadVolume, OverdueRow, OverviewSummary, ProjectStats, RecentActivityRow,
    RecentProgressRow, SystemOverview, TimelineStats, TopProjectRow, UserActivityCount, UserStats,
};

/// Provides aggregate statistics for dashboards and exports.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Project counts, status/priority distribution, and monthly trend.
    pub async fn project_stats(pool: &PgPool) -> Result<ProjectStats, sqlx::Error> {
        let total_projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        let recent_projects: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE created_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        let by_status = sqlx::query_as::<_, LabelCount>(
            "SELECT status AS label, COUNT(*) AS count \
             FROM projects GROUP BY status ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;

        let by_priority = sqlx::query_as::<_, LabelCount>(
            "SELECT priority AS label, COUNT(*) AS count \
             FROM projects GROUP BY priority ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;

        let monthly_trend = sqlx::query_as::<_, MonthlyCount>(
            "SELECT DATE_TRUNC('month', created_at)::DATE AS month, COUNT(*) AS count \
             FROM projects \
             WHERE created_at >= NOW() - INTERVAL '6 months' \
             GROUP BY DATE_TRUNC('month', created_at) \
             ORDER BY month DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(ProjectStats {
            total_projects,
            recent_projects,
            by_status,
            by_priority,
            monthly_trend,
        })
    }

    /// User counts, role distribution, and most active project creators.
    pub async fn user_stats(pool: &PgPool) -> Result<UserStats, sqlx::Error> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        let recent_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE created_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        let by_role = sqlx::query_as::<_, LabelCount>(
            "SELECT role AS label, COUNT(*) AS count \
             FROM users GROUP BY role ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;

        let most_active = sqlx::query_as::<_, UserActivityCount>(
            "SELECT u.name, COUNT(p.id) AS count \
             FROM users u \
             LEFT JOIN projects p ON u.id = p.created_by \
             GROUP BY u.id, u.name \
             ORDER BY count DESC \
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;

        Ok(UserStats {
            total_users,
            recent_users,
            by_role,
            most_active,
        })
    }

    /// Upload counts, sizes, and MIME-category breakdown.
    pub async fn file_stats(pool: &PgPool) -> Result<FileStats, sqlx::Error> {
        let total_files: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_attachments")
            .fetch_one(pool)
            .await?;

        // SUM over BIGINT widens to NUMERIC; cast back for decoding.
        let total_size: Option<i64> =
            sqlx::query_scalar("SELECT SUM(size)::BIGINT FROM project_attachments")
                .fetch_one(pool)
                .await?;

        let by_type = sqlx::query_as::<_, FileTypeBreakdown>(
            "SELECT CASE \
                 WHEN type LIKE 'image/%' THEN 'Images' \
                 WHEN type LIKE 'video/%' THEN 'Videos' \
                 WHEN type LIKE 'audio/%' THEN 'Audio' \
                 WHEN type = 'application/pdf' THEN 'PDFs' \
                 WHEN type LIKE 'application/%' THEN 'Documents' \
                 WHEN type LIKE 'text/%' THEN 'Text Files' \
                 ELSE 'Other' \
             END AS category, \
             COUNT(*) AS count, SUM(size)::BIGINT AS total_size \
             FROM project_attachments \
             GROUP BY category \
             ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;

        let recent_uploads: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_attachments \
             WHERE uploaded_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        let monthly_trend = sqlx::query_as::<_, MonthlyUploadVolume>(
            "SELECT DATE_TRUNC('month', uploaded_at)::DATE AS month, \
                    COUNT(*) AS count, SUM(size)::BIGINT AS total_size \
             FROM project_attachments \
             WHERE uploaded_at >= NOW() - INTERVAL '6 months' \
             GROUP BY DATE_TRUNC('month', uploaded_at) \
             ORDER BY month DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(FileStats {
            total_files,
            total_size: total_size.unwrap_or(0),
            recent_uploads,
            by_type,
            monthly_trend,
        })
    }

    /// Comment counts and most active commenters.
    pub async fn comment_stats(pool: &PgPool) -> Result<CommentStats, sqlx::Error> {
        let total_comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_comments")
            .fetch_one(pool)
            .await?;

        let recent_comments: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_comments \
             WHERE created_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        let most_active = sqlx::query_as::<_, UserActivityCount>(
            "SELECT u.name, COUNT(pc.id) AS count \
             FROM users u \
             LEFT JOIN project_comments pc ON u.id = pc.author_id \
             GROUP BY u.id, u.name \
             ORDER BY count DESC \
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;

        let monthly_trend = sqlx::query_as::<_, MonthlyCount>(
            "SELECT DATE_TRUNC('month', created_at)::DATE AS month, COUNT(*) AS count \
             FROM project_comments \
             WHERE created_at >= NOW() - INTERVAL '6 months' \
             GROUP BY DATE_TRUNC('month', created_at) \
             ORDER BY month DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(CommentStats {
            total_comments,
            recent_comments,
            most_active,
            monthly_trend,
        })
    }

    /// Combined entity counts, trailing-week activity, and top projects.
    pub async fn overview(pool: &PgPool) -> Result<SystemOverview, sqlx::Error> {
        let (projects, users, files, comments): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM projects), \
                    (SELECT COUNT(*) FROM users), \
                    (SELECT COUNT(*) FROM project_attachments), \
                    (SELECT COUNT(*) FROM project_comments)",
        )
        .fetch_one(pool)
        .await?;

        let recent_activity = sqlx::query_as::<_, RecentActivityRow>(
            "SELECT 'projects' AS entity, COUNT(*) AS count FROM projects \
             WHERE created_at >= NOW() - INTERVAL '7 days' \
             UNION ALL \
             SELECT 'files' AS entity, COUNT(*) AS count FROM project_attachments \
             WHERE uploaded_at >= NOW() - INTERVAL '7 days' \
             UNION ALL \
             SELECT 'comments' AS entity, COUNT(*) AS count FROM project_comments \
             WHERE created_at >= NOW() - INTERVAL '7 days'",
        )
        .fetch_all(pool)
        .await?;

        let top_projects = sqlx::query_as::<_, TopProjectRow>(
            "SELECT p.name, \
                    COUNT(DISTINCT pa.id) AS file_count, \
                    COUNT(DISTINCT pc.id) AS comment_count \
             FROM projects p \
             LEFT JOIN project_attachments pa ON p.id = pa.project_id \
             LEFT JOIN project_comments pc ON p.id = pc.project_id \
             GROUP BY p.id, p.name \
             ORDER BY file_count DESC, comment_count DESC \
             LIMIT 5",
        )
        .fetch_all(pool)
        .await?;

        Ok(SystemOverview {
            summary: OverviewSummary {
                projects,
                users,
                files,
                comments,
            },
            recent_activity,
            top_projects,
        })
    }

    /// Upcoming deadlines, overdue items, and recent progress updates.
    pub async fn timeline_stats(pool: &PgPool) -> Result<TimelineStats, sqlx::Error> {
        let upcoming_deadlines = sqlx::query_as::<_, DeadlineRow>(
            "SELECT m.id, m.name, 'milestone' AS item_type, m.due_date, \
                    p.name AS project_name \
             FROM project_milestones m \
             JOIN projects p ON m.project_id = p.id \
             WHERE m.due_date BETWEEN CURRENT_DATE AND CURRENT_DATE + INTERVAL '7 days' \
               AND m.status != $1 \
             UNION ALL \
             SELECT t.id, t.name, 'task' AS item_type, t.due_date, \
                    p.name AS project_name \
             FROM project_tasks t \
             JOIN projects p ON t.project_id = p.id \
             WHERE t.due_date BETWEEN CURRENT_DATE AND CURRENT_DATE + INTERVAL '7 days' \
               AND t.status NOT IN ($2, $3) \
             ORDER BY due_date",
        )
        .bind(MILESTONE_STATUS_COMPLETED)
        .bind(TASK_STATUS_COMPLETED)
        .bind(TASK_STATUS_CANCELLED)
        .fetch_all(pool)
        .await?;

        let overdue_items = sqlx::query_as::<_, OverdueRow>(
            "SELECT m.id, m.name, 'milestone' AS item_type, m.due_date, \
                    p.name AS project_name, \
                    (CURRENT_DATE - m.due_date)::INT AS days_overdue \
             FROM project_milestones m \
             JOIN projects p ON m.project_id = p.id \
             WHERE m.due_date < CURRENT_DATE AND m.status != $1 \
             UNION ALL \
             SELECT t.id, t.name, 'task' AS item_type, t.due_date, \
                    p.name AS project_name, \
                    (CURRENT_DATE - t.due_date)::INT AS days_overdue \
             FROM project_tasks t \
             JOIN projects p ON t.project_id = p.id \
             WHERE t.due_date < CURRENT_DATE AND t.status NOT IN ($2, $3) \
             ORDER BY days_overdue DESC",
        )
        .bind(MILESTONE_STATUS_COMPLETED)
        .bind(TASK_STATUS_COMPLETED)
        .bind(TASK_STATUS_CANCELLED)
        .fetch_all(pool)
        .await?;

        let recent_progress = sqlx::query_as::<_, RecentProgressRow>(
            "SELECT p.id AS project_id, p.name AS project_name, p.progress, p.updated_at \
             FROM projects p \
             WHERE p.updated_at >= CURRENT_DATE - INTERVAL '7 days' \
             ORDER BY p.updated_at DESC \
             LIMIT 10",
        )
        .fetch_all(pool)
        .await?;

        Ok(TimelineStats {
            upcoming_deadlines,
            overdue_items,
            recent_progress,
        })
    }
}
