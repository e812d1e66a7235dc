//! Listing-level rules shared by the lifecycle services.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Result of an operation spanning the database and the upload tree.
///
/// The database part either committed or the operation failed outright; the
/// filesystem part runs afterwards and may leave the tree stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Database and upload tree are consistent.
    Committed,
    /// The database change committed but the filesystem step failed.
    PartiallyFailed { cause: String },
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed)
    }
}

/// A newly created listing together with the state of its upload subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: DbId,
    pub outcome: Outcome,
}

/// Ensure a listing title is present. Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<&str, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ConstraintViolation("Title is required".into()));
    }
    Ok(trimmed)
}
