//! Handlers for the `/search` resource.

use axum::extract::{Query, State};
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::search::{like_pattern, MIN_SUGGESTION_QUERY_LEN};
use khelo_db::models::search::{FileHit, ProjectHit, SearchParams, SearchResults, Suggestion};
use khelo_db::repositories::SearchRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `GET /search`.
#[derive(Debug, Serialize)]
pub struct UnifiedSearchResponse {
    pub query: String,
    pub total_results: usize,
    pub results: SearchResults,
}

/// Response body for `GET /search/projects`.
#[derive(Debug, Serialize)]
pub struct ProjectSearchResponse {
    pub query: String,
    pub total_results: usize,
    pub projects: Vec<ProjectHit>,
}

/// Response body for `GET /search/files`.
#[derive(Debug, Serialize)]
pub struct FileSearchResponse {
    pub query: String,
    pub total_results: usize,
    pub files: Vec<FileHit>,
}

/// Query parameters for `GET /search/suggestions`.
#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
}

/// Response body for `GET /search/suggestions`.
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Extract and validate the query string from search params.
fn require_query(params: &SearchParams) -> AppResult<(String, String)> {
    let raw = params.q.as_deref().unwrap_or("");
    let pattern = like_pattern(raw).ok_or_else(|| {
        AppError::Core(CoreError::Validation("Search query is required".into()))
    })?;
    Ok((raw.trim().to_string(), pattern))
}

/// GET /api/v1/search
///
/// Unified search across projects, files, and comments. The `type`
/// parameter restricts the search to one entity kind.
pub async fn unified(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<UnifiedSearchResponse>> {
    let (query, pattern) = require_query(&params)?;
    let kind = params.entity_type.as_deref();

    let mut results = SearchResults::default();
    if kind.is_none() || kind == Some("projects") {
        results.projects = Some(SearchRepo::search_projects(&state.pool, &params, &pattern).await?);
    }
    if kind.is_none() || kind == Some("files") {
        results.files = Some(SearchRepo::search_files(&state.pool, &params, &pattern).await?);
    }
    if kind.is_none() || kind == Some("comments") {
        results.comments = Some(SearchRepo::search_comments(&state.pool, &params, &pattern).await?);
    }

    let total_results = results.projects.as_ref().map_or(0, Vec::len)
        + results.files.as_ref().map_or(0, Vec::len)
        + results.comments.as_ref().map_or(0, Vec::len);

    tracing::debug!(query = %query, total_results, "Search executed");

    Ok(Json(UnifiedSearchResponse {
        query,
        total_results,
        results,
    }))
}

/// GET /api/v1/search/projects
pub async fn projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ProjectSearchResponse>> {
    let (query, pattern) = require_query(&params)?;
    let projects = SearchRepo::search_projects(&state.pool, &params, &pattern).await?;
    Ok(Json(ProjectSearchResponse {
        query,
        total_results: projects.len(),
        projects,
    }))
}

/// GET /api/v1/search/files
pub async fn files(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<FileSearchResponse>> {
    let (query, pattern) = require_query(&params)?;
    let files = SearchRepo::search_files(&state.pool, &params, &pattern).await?;
    Ok(Json(FileSearchResponse {
        query,
        total_results: files.len(),
        files,
    }))
}

/// GET /api/v1/search/suggestions
///
/// Typeahead over project names and tags. Queries shorter than two
/// characters yield an empty list rather than an error.
pub async fn suggestions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<SuggestionsResponse>> {
    let query = params.q.unwrap_or_default();
    if query.trim().len() < MIN_SUGGESTION_QUERY_LEN {
        return Ok(Json(SuggestionsResponse {
            suggestions: Vec::new(),
        }));
    }

    let suggestions = SearchRepo::suggestions(&state.pool, &query).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}
