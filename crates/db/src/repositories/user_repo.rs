//! Repository for the `users` table.

use khelo_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{NewUser, User, UserSummary};

/// Column list shared across user queries.
const COLUMNS: &str =
    "id, name, email, password_hash, role, avatar, created_at, updated_at, last_login";

/// Provides account lookup and registration operations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by their internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (login path).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Stamp a successful login.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List all users as public summaries, for assignee/allocation pickers.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, role, avatar FROM users ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Emails of users who should receive project notifications: the
    /// project creator plus all Managers and Admins.
    pub async fn notification_recipients(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<(String, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT DISTINCT u.name, u.email \
             FROM users u \
             LEFT JOIN projects p ON p.created_by = u.id \
             WHERE p.id = $1 OR u.role IN ('Admin', 'Manager') \
             ORDER BY u.name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
