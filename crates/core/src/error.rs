use crate::types::DbId;

/// Error kinds surfaced by the listing service.
///
/// `Storage` and `Filesystem` carry the underlying cause for logging; the
/// transport layer never shows it to clients.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("File '{name}' not found for listing {listing_id}")]
    FileNotFound { listing_id: DbId, name: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{entity} with id {id} is still in use")]
    InUse { entity: &'static str, id: DbId },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Filesystem failure: {0}")]
    Filesystem(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Filesystem(err.to_string())
    }
}
