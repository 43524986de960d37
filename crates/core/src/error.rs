use crate::types::DbId;

/// Domain-level failure shared by the repository and HTTP layers.
///
/// Bracket engine errors convert into this type (see
/// `impl From<BracketError> for CoreError` in [`crate::bracket`]).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but clashes with current state, e.g.
    /// registering after the window closed or reporting a decided match.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
