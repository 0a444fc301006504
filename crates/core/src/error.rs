use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The record is locked by another user and the requested operation
    /// would override that lock.
    #[error("Locked: {content_type} #{entry_id} is locked by {holder}")]
    Locked {
        content_type: String,
        entry_id: DbId,
        holder: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
