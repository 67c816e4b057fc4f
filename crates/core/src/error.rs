use crate::types::DbId;

/// Domain failure taxonomy shared by every layer.
///
/// Each variant is recoverable at the caller's discretion and must reach the
/// calling layer with its kind intact.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing draft, used wherever existence must not leak.
    pub fn draft_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Draft",
            id,
        }
    }
}
