use crate::types::DbId;

/// Domain error taxonomy shared across the db and api crates.
///
/// Every cart operation resolves to either a success or one of these
/// variants at its boundary; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint raced with a concurrent writer.
    /// Callers should retry the whole operation once.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Fewer units are available than the caller asked to reserve.
    /// Carries the actual available quantity so the caller can offer a
    /// corrected amount.
    #[error("Only {available} left in stock")]
    InsufficientStock { available: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
