//! Error type for repositories that enforce domain invariants.
//!
//! Plain CRUD repositories return `sqlx::Error` directly; the ledger and
//! capacity-guard repositories can also fail domain validation mid
//! transaction, so they return [`DbError`] instead.

use khelo_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain rule was violated (validation, capacity, missing entity).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database-level failure.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
