//! Handlers for the `/users` resource (registration, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use khelo_core::error::CoreError;
use khelo_core::roles::{is_valid_role, ROLE_TEAM_MEMBER};
use khelo_core::types::{DbId, Timestamp};
use khelo_db::models::user::{NewUser, UserSummary};
use khelo_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `Team Member` if omitted.
    pub role: Option<String>,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserInfo,
    pub token: String,
}

/// Response body for `GET /users/profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: Profile,
}

/// Full profile of the authenticated user.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: Option<String>,
    pub created_at: Timestamp,
    pub last_login: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Create an account and return a bearer token.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name, email, and password are required".into(),
        )));
    }
    if !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid email format".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.as_deref().unwrap_or(ROLE_TEAM_MEMBER);
    if !is_valid_role(role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: '{role}'"
        ))));
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "User with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &NewUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: role.to_string(),
        },
    )
    .await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    // Welcome email is fire-and-forget.
    if let Some(mailer) = state.mailer.clone() {
        let (name, email, role) = (user.name.clone(), user.email.clone(), user.role.clone());
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome(&name, &email, &role).await {
                tracing::warn!(error = %e, to = %email, "Failed to send welcome email");
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: UserInfo {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
            token,
        }),
    ))
}

/// POST /api/v1/users/login
///
/// Authenticate with email + password. Returns a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email and password are required".into(),
        )));
    }

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
        token,
    }))
}

/// GET /api/v1/users/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(ProfileResponse {
        user: Profile {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            last_login: user.last_login,
        },
    }))
}

/// GET /api/v1/users
///
/// Directory of all users, for assignee and allocation pickers.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}
