//! Mapping of driver errors onto the service's error kinds.

use maison_core::error::CoreError;
use sqlx::error::ErrorKind;

/// Classify a sqlx error into a [`CoreError`].
///
/// - Foreign key, unique, not-null and check violations become
///   `ConstraintViolation` with a client-safe message.
/// - Everything else (connection, transaction begin/commit, decoding) becomes
///   `Storage`.
///
/// `RowNotFound` is not special-cased: repositories return `Option` for
/// lookups, and callers build `NotFound` with the entity name they know.
pub fn classify_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let message = match db_err.kind() {
            ErrorKind::ForeignKeyViolation => {
                Some("Referenced entity does not exist or is still in use")
            }
            ErrorKind::UniqueViolation => Some("A record with the same value already exists"),
            ErrorKind::NotNullViolation => Some("A required field is missing"),
            ErrorKind::CheckViolation => Some("A field has an invalid value"),
            _ => None,
        };
        if let Some(message) = message {
            tracing::debug!(error = %db_err, "Constraint violation");
            return CoreError::ConstraintViolation(message.to_string());
        }
    }

    CoreError::Storage(err.to_string())
}

/// Whether `err` is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
