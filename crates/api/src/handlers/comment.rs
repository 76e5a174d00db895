//! Handlers for the `/comments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::roles::ROLE_ADMIN;
use khelo_core::types::DbId;
use khelo_db::models::comment::{Comment, CommentWithAuthor, CreateComment, UpdateComment};
use khelo_db::repositories::{CommentRepo, ProjectRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications::notify_project_event;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Response body for comment listings.
#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentWithAuthor>,
}

/// GET /api/v1/comments/project/{project_id}
pub async fn list_for_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<CommentsResponse>> {
    let comments = CommentRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/v1/comments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentWithAuthor>)> {
    input.validate()?;
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comment content is required".into(),
        )));
    }

    let comment = CommentRepo::create(&state.pool, &input, auth.user_id).await?;

    if let Some(project) = ProjectRepo::find_by_id(&state.pool, input.project_id).await? {
        notify_project_event(
            &state,
            project.id,
            auth.user_id,
            project.name,
            "added a comment to",
        );
    }

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/v1/comments/{id}
///
/// Only the author can edit their comment.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<Json<Comment>> {
    input.validate()?;

    let existing = CommentRepo::find_for_moderation(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    if existing.comment.author_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only edit your own comments".into(),
        )));
    }

    let comment = CommentRepo::update(&state.pool, id, &input).await?;
    Ok(Json(comment))
}

/// DELETE /api/v1/comments/{id}
///
/// The author, the project creator, or an Admin can delete a comment.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let existing = CommentRepo::find_for_moderation(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    let can_delete = existing.comment.author_id == Some(auth.user_id)
        || existing.project_creator == Some(auth.user_id)
        || auth.role == ROLE_ADMIN;
    if !can_delete {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to delete this comment".into(),
        )));
    }

    CommentRepo::delete(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "Comment deleted successfully",
    }))
}
