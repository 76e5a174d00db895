//! Repository for search across projects, attachments, and comments.
//!
//! Matching is case-insensitive substring search (`ILIKE`) over the
//! entities' text columns; project tags are matched via their text
//! rendering. Optional status/priority/date filters narrow project hits.

use khelo_core::search::{clamp_limit, like_pattern, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use sqlx::PgPool;

use crate::models::search::{CommentHit, FileHit, ProjectHit, SearchParams, Suggestion};

/// Provides ILIKE-based search operations.
pub struct SearchRepo;

impl SearchRepo {
    /// Search projects by name, description, scope, or tags.
    pub async fn search_projects(
        pool: &PgPool,
        params: &SearchParams,
        pattern: &str,
    ) -> Result<Vec<ProjectHit>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

        sqlx::query_as::<_, ProjectHit>(
            "SELECT p.id, p.name, p.description, p.status, p.priority, p.tags, \
                    u.name AS created_by_name, p.created_at \
             FROM projects p \
             LEFT JOIN users u ON p.created_by = u.id \
             WHERE (p.name ILIKE $1 OR p.description ILIKE $1 OR \
                    p.scope ILIKE $1 OR p.tags::TEXT ILIKE $1) \
               AND ($2::VARCHAR IS NULL OR p.status = $2) \
               AND ($3::VARCHAR IS NULL OR p.priority = $3) \
               AND ($4::DATE IS NULL OR p.created_at >= $4) \
               AND ($5::DATE IS NULL OR p.created_at <= $5) \
             ORDER BY p.created_at DESC \
             LIMIT $6",
        )
        .bind(pattern)
        .bind(&params.status)
        .bind(&params.priority)
        .bind(params.date_from)
        .bind(params.date_to)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Search attachments by file name or owning project name.
    pub async fn search_files(
        pool: &PgPool,
        params: &SearchParams,
        pattern: &str,
    ) -> Result<Vec<FileHit>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

        sqlx::query_as::<_, FileHit>(
            "SELECT pa.id, pa.name, pa.url, pa.size, pa.type, \
                    p.name AS project_name, u.name AS uploaded_by_name, pa.uploaded_at \
             FROM project_attachments pa \
             JOIN projects p ON pa.project_id = p.id \
             LEFT JOIN users u ON pa.uploaded_by = u.id \
             WHERE (pa.name ILIKE $1 OR p.name ILIKE $1) \
               AND ($2::DATE IS NULL OR pa.uploaded_at >= $2) \
               AND ($3::DATE IS NULL OR pa.uploaded_at <= $3) \
             ORDER BY pa.uploaded_at DESC \
             LIMIT $4",
        )
        .bind(pattern)
        .bind(params.date_from)
        .bind(params.date_to)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Search comments by content.
    pub async fn search_comments(
        pool: &PgPool,
        params: &SearchParams,
        pattern: &str,
    ) -> Result<Vec<CommentHit>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

        sqlx::query_as::<_, CommentHit>(
            "SELECT pc.id, pc.content, p.name AS project_name, \
                    u.name AS author_name, pc.created_at \
             FROM project_comments pc \
             JOIN projects p ON pc.project_id = p.id \
             LEFT JOIN users u ON pc.author_id = u.id \
             WHERE pc.content ILIKE $1 \
             ORDER BY pc.created_at DESC \
             LIMIT $2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Typeahead suggestions: matching project names and tags.
    pub async fn suggestions(pool: &PgPool, query: &str) -> Result<Vec<Suggestion>, sqlx::Error> {
        let Some(pattern) = like_pattern(query) else {
            return Ok(Vec::new());
        };

        let project_names: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT name FROM projects WHERE name ILIKE $1 ORDER BY name LIMIT 5",
        )
        .bind(&pattern)
        .fetch_all(pool)
        .await?;

        let tags: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT tag FROM projects, UNNEST(tags) AS tag \
             WHERE tag ILIKE $1 ORDER BY tag LIMIT 5",
        )
        .bind(&pattern)
        .fetch_all(pool)
        .await?;

        let suggestions = project_names
            .into_iter()
            .map(|(value,)| Suggestion {
                kind: "project",
                value,
            })
            .chain(tags.into_iter().map(|(value,)| Suggestion {
                kind: "tag",
                value,
            }))
            .collect();

        Ok(suggestions)
    }
}
