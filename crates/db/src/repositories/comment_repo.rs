//! Repository for the `project_comments` table.

use khelo_core::error::CoreError;
use khelo_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::comment::{
    Comment, CommentModerationView, CommentWithAuthor, CreateComment, UpdateComment,
};

/// Comment columns prefixed for JOIN queries.
const JOINED_COLUMNS: &str =
    "pc.id, pc.project_id, pc.task_id, pc.author_id, pc.content, pc.created_at, pc.updated_at";

/// Provides CRUD operations for project comments.
pub struct CommentRepo;

impl CommentRepo {
    /// List a project's comments with author identities, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, \
                    u.name AS author_name, u.avatar AS author_avatar \
             FROM project_comments pc \
             LEFT JOIN users u ON pc.author_id = u.id \
             WHERE pc.project_id = $1 \
             ORDER BY pc.created_at DESC"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Post a comment on a project.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
        author_id: DbId,
    ) -> Result<CommentWithAuthor, DbError> {
        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(input.project_id)
                .fetch_optional(pool)
                .await?;
        if project_exists.is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            }
            .into());
        }

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO project_comments (project_id, task_id, author_id, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, project_id, task_id, author_id, content, created_at, updated_at",
        )
        .bind(input.project_id)
        .bind(input.task_id)
        .bind(author_id)
        .bind(input.content.trim())
        .fetch_one(pool)
        .await?;

        let (author_name, author_avatar): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT name, avatar FROM users WHERE id = $1")
                .bind(author_id)
                .fetch_one(pool)
                .await?;

        Ok(CommentWithAuthor {
            comment,
            author_name,
            author_avatar,
        })
    }

    /// Find a comment together with the owning project's creator.
    pub async fn find_for_moderation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommentModerationView>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, p.created_by AS project_creator \
             FROM project_comments pc \
             JOIN projects p ON pc.project_id = p.id \
             WHERE pc.id = $1"
        );
        sqlx::query_as::<_, CommentModerationView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Edit a comment's content.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "UPDATE project_comments \
             SET content = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, project_id, task_id, author_id, content, created_at, updated_at",
        )
        .bind(id)
        .bind(input.content.trim())
        .fetch_one(pool)
        .await
    }

    /// Delete a comment.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
