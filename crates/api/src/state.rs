use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::EmailNotifier;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: khelo_db::DbPool,
    /// Server configuration (JWT secret, upload directory, CORS origins).
    pub config: Arc<ServerConfig>,
    /// Optional SMTP notifier; `None` when SMTP is not configured.
    pub mailer: Option<Arc<EmailNotifier>>,
}
