//! Attachment metadata model and DTOs.
//!
//! Only metadata lives in the database; file bytes are written to the
//! uploads directory by the API layer.

use khelo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_attachments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub url: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub uploaded_by: Option<DbId>,
    pub uploaded_at: Timestamp,
}

/// Attachment row joined with the uploader's display name and project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttachmentWithUploader {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attachment: Attachment,
    pub uploaded_by_name: Option<String>,
}

/// Attachment row joined with the owning project's creator, for download
/// and deletion permission checks.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentAccessView {
    #[sqlx(flatten)]
    pub attachment: Attachment,
    pub project_creator: Option<DbId>,
}

/// Insert input assembled by the upload handler.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub project_id: DbId,
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub uploaded_by: DbId,
}
