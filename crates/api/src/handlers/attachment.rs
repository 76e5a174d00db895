//! Handlers for the `/files` resource.
//!
//! File bytes live under the configured uploads directory; only metadata
//! is stored in the database. The ledger and allocation logic never touch
//! this subsystem.

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::roles::{is_management, ROLE_ADMIN};
use khelo_core::types::DbId;
use khelo_db::models::attachment::{Attachment, AttachmentWithUploader, NewAttachment};
use khelo_db::repositories::{AttachmentRepo, ProjectRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications::notify_project_event;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Maximum accepted upload size in bytes (10 MiB).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub attachment: Attachment,
}

/// Response body for attachment listings.
#[derive(Debug, Serialize)]
pub struct AttachmentsResponse {
    pub attachments: Vec<AttachmentWithUploader>,
}

/// POST /api/v1/files/upload
///
/// Multipart upload with `file` and `project_id` fields. Only the project
/// creator, Managers, or Admins may attach files.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut project_id: Option<DbId> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("attachment").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::BadRequest("File exceeds the 10 MB limit".into()));
                }
                file = Some((filename, content_type, data.to_vec()));
            }
            "project_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                project_id = Some(
                    text.parse()
                        .map_err(|_| AppError::BadRequest("Invalid project_id".into()))?,
                );
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    let project_id =
        project_id.ok_or_else(|| AppError::BadRequest("Project ID is required".into()))?;

    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let can_upload = project.created_by == Some(auth.user_id) || is_management(&auth.role);
    if !can_upload {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to upload files to this project".into(),
        )));
    }

    // Store under a unique name so uploads can never clobber each other;
    // the original filename survives in the metadata row.
    let safe_name = sanitize_filename(&filename);
    let stored_name = format!("{}_{safe_name}", Uuid::new_v4());
    let dir = FsPath::new(&state.config.upload_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    let size = data.len() as i64;
    tokio::fs::write(dir.join(&stored_name), data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let attachment = AttachmentRepo::create(
        &state.pool,
        &NewAttachment {
            project_id,
            name: filename,
            url: format!("/uploads/{stored_name}"),
            content_type,
            size,
            uploaded_by: auth.user_id,
        },
    )
    .await?;

    notify_project_event(
        &state,
        project.id,
        auth.user_id,
        project.name,
        "uploaded a file to",
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully",
            attachment,
        }),
    ))
}

/// GET /api/v1/files/project/{project_id}
pub async fn list_for_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<AttachmentsResponse>> {
    let attachments = AttachmentRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(AttachmentsResponse { attachments }))
}

/// GET /api/v1/files/download/{id}
///
/// Streams the stored bytes back with the original filename.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl axum::response::IntoResponse> {
    let view = AttachmentRepo::find_with_access(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;

    let has_access = view.project_creator == Some(auth.user_id) || is_management(&auth.role);
    if !has_access {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to download this file".into(),
        )));
    }

    let stored_name = view
        .attachment
        .url
        .strip_prefix("/uploads/")
        .unwrap_or(&view.attachment.url);
    let path = FsPath::new(&state.config.upload_dir).join(stored_name);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "File", id }))?;

    let content_type = view
        .attachment
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", view.attachment.name),
        ),
    ];
    Ok((headers, bytes))
}

/// DELETE /api/v1/files/{id}
///
/// The uploader, the project creator, or an Admin can delete a file.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let view = AttachmentRepo::find_with_access(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;

    let can_delete = view.attachment.uploaded_by == Some(auth.user_id)
        || view.project_creator == Some(auth.user_id)
        || auth.role == ROLE_ADMIN;
    if !can_delete {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to delete this file".into(),
        )));
    }

    // Best-effort removal of the stored bytes; the metadata row is the
    // source of truth.
    if let Some(stored_name) = view.attachment.url.strip_prefix("/uploads/") {
        let path = FsPath::new(&state.config.upload_dir).join(stored_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove uploaded file");
        }
    }

    AttachmentRepo::delete(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "File deleted successfully",
    }))
}

/// Strip path separators and control characters from a client filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0'..='\x1f' => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("report\\q1.pdf"), "report_q1.pdf");
    }

    #[test]
    fn test_sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("roster 2026.xlsx"), "roster 2026.xlsx");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "attachment");
    }
}
