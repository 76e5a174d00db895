//! Shared response types for API handlers.

use serde::Serialize;

/// Standard `{ "message": ... }` acknowledgment body, returned by
/// deletions and other mutations with no entity payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
