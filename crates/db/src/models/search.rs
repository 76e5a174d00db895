//! Search parameter and result-row types.

use chrono::NaiveDate;
use khelo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Query parameters for the unified and scoped search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The search query string.
    pub q: Option<String>,
    /// `projects`, `files`, or `comments`; unset searches everything.
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

/// A project matched by search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectHit {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub created_by_name: Option<String>,
    pub created_at: Timestamp,
}

/// An attachment matched by search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileHit {
    pub id: DbId,
    pub name: String,
    pub url: String,
    pub size: Option<i64>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub project_name: String,
    pub uploaded_by_name: Option<String>,
    pub uploaded_at: Timestamp,
}

/// A comment matched by search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentHit {
    pub id: DbId,
    pub content: String,
    pub project_name: String,
    pub author_name: Option<String>,
    pub created_at: Timestamp,
}

/// Grouped results for the unified search endpoint.
#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentHit>>,
}

/// A typeahead suggestion (project name or tag).
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}
