//! Handlers for the `/analytics` resource. Thin pass-throughs over the
//! aggregate queries.

use axum::extract::State;
use axum::Json;
use khelo_db::models::analytics::{
    CommentStats, FileStats, ProjectStats, SystemOverview, UserStats,
};
use khelo_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/analytics/projects
pub async fn projects(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<ProjectStats>> {
    Ok(Json(AnalyticsRepo::project_stats(&state.pool).await?))
}

/// GET /api/v1/analytics/users
pub async fn users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<UserStats>> {
    Ok(Json(AnalyticsRepo::user_stats(&state.pool).await?))
}

/// GET /api/v1/analytics/files
pub async fn files(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<FileStats>> {
    Ok(Json(AnalyticsRepo::file_stats(&state.pool).await?))
}

/// GET /api/v1/analytics/comments
pub async fn comments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<CommentStats>> {
    Ok(Json(AnalyticsRepo::comment_stats(&state.pool).await?))
}

/// GET /api/v1/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<SystemOverview>> {
    Ok(Json(AnalyticsRepo::overview(&state.pool).await?))
}
