//! Repository for the `project_attachments` table (metadata only; file
//! bytes live in the uploads directory).

use khelo_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{
    Attachment, AttachmentAccessView, AttachmentWithUploader, NewAttachment,
};

/// Column list shared across attachment queries.
const COLUMNS: &str = "id, project_id, name, url, type, size, uploaded_by, uploaded_at";

/// Attachment columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str =
    "pa.id, pa.project_id, pa.name, pa.url, pa.type, pa.size, pa.uploaded_by, pa.uploaded_at";

/// Provides metadata operations for uploaded files.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Record an uploaded file's metadata.
    pub async fn create(pool: &PgPool, input: &NewAttachment) -> Result<Attachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_attachments \
                (project_id, name, url, type, size, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.url)
            .bind(&input.content_type)
            .bind(input.size)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// List a project's attachments with uploader names, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AttachmentWithUploader>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, u.name AS uploaded_by_name \
             FROM project_attachments pa \
             LEFT JOIN users u ON pa.uploaded_by = u.id \
             WHERE pa.project_id = $1 \
             ORDER BY pa.uploaded_at DESC"
        );
        sqlx::query_as::<_, AttachmentWithUploader>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find an attachment together with the owning project's creator.
    pub async fn find_with_access(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttachmentAccessView>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, p.created_by AS project_creator \
             FROM project_attachments pa \
             JOIN projects p ON pa.project_id = p.id \
             WHERE pa.id = $1"
        );
        sqlx::query_as::<_, AttachmentAccessView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an attachment's metadata row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_attachments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
