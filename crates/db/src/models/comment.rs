//! Comment entity model and DTOs.

use khelo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `project_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Comment row joined with the author's display identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
}

/// Comment row joined with the owning project's creator, for permission
/// checks on edit/delete.
#[derive(Debug, Clone, FromRow)]
pub struct CommentModerationView {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub project_creator: Option<DbId>,
}

/// DTO for posting a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}

/// DTO for editing a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}
