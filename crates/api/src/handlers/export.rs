//! Handlers for the `/export` resource: CSV downloads.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use khelo_db::repositories::{AnalyticsRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Build a CSV attachment response.
fn csv_response(filename: &str, data: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        data,
    )
}

/// Finish a CSV writer, surfacing any buffered error.
fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV write error: {e}")))
}

/// GET /api/v1/export/projects/csv
///
/// All projects as a CSV attachment.
pub async fn projects_csv(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list(&state.pool).await?;

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "Name",
        "Description",
        "Scope",
        "Status",
        "Priority",
        "Tags",
        "Created At",
        "Created By",
    ])
    .map_err(|e| AppError::InternalError(format!("CSV write error: {e}")))?;

    for row in &projects {
        let p = &row.project;
        wtr.write_record([
            p.name.as_str(),
            p.description.as_deref().unwrap_or(""),
            p.scope.as_deref().unwrap_or(""),
            p.status.as_str(),
            p.priority.as_str(),
            &p.tags.join("; "),
            &p.created_at.to_rfc3339(),
            row.created_by_name.as_deref().unwrap_or(""),
        ])
        .map_err(|e| AppError::InternalError(format!("CSV write error: {e}")))?;
    }

    let data = finish_csv(wtr)?;
    Ok(csv_response("projects_export.csv", data))
}

/// GET /api/v1/export/analytics/csv
///
/// Headline counts plus status and priority distributions as CSV.
pub async fn analytics_csv(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let project_stats = AnalyticsRepo::project_stats(&state.pool).await?;
    let user_stats = AnalyticsRepo::user_stats(&state.pool).await?;
    let file_stats = AnalyticsRepo::file_stats(&state.pool).await?;

    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut write = |record: &[&str]| {
        wtr.write_record(record)
            .map_err(|e| AppError::InternalError(format!("CSV write error: {e}")))
    };

    write(&["Summary", ""])?;
    write(&["Total Projects", &project_stats.total_projects.to_string()])?;
    write(&["Total Users", &user_stats.total_users.to_string()])?;
    write(&["Total Files", &file_stats.total_files.to_string()])?;
    write(&["", ""])?;

    write(&["Projects by Status", ""])?;
    write(&["Status", "Count"])?;
    for row in &project_stats.by_status {
        write(&[row.label.as_str(), &row.count.to_string()])?;
    }
    write(&["", ""])?;

    write(&["Projects by Priority", ""])?;
    write(&["Priority", "Count"])?;
    for row in &project_stats.by_priority {
        write(&[row.label.as_str(), &row.count.to_string()])?;
    }

    let data = finish_csv(wtr)?;
    Ok(csv_response("analytics_report.csv", data))
}
