//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /register  -> register (public)
/// POST /login     -> login (public)
/// GET  /profile   -> profile (requires auth)
/// GET  /          -> list (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        .route("/", get(auth::list))
}
