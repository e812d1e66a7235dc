//! Publication records: where and when a listing was advertised.
//!
//! Submissions arrive as raw `(url, date)` text pairs. Invalid pairs are
//! dropped rather than rejected; a submission is refused only when no usable
//! pair remains.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Accepted publication date format (`YYYY-MM-DD`).
pub const PUBLICATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw `(url, date)` pair as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublicationSubmission {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date: String,
}

impl PublicationSubmission {
    pub fn new(url: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            date: date.into(),
        }
    }
}

/// A validated publication ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationEntry {
    pub url: String,
    pub date: NaiveDate,
}

/// Parse a publication date. Only the exact `YYYY-MM-DD` shape is accepted.
///
/// # Examples
///
/// ```
/// use maison_core::publication::parse_publication_date;
///
/// assert!(parse_publication_date("2024-01-10").is_ok());
/// assert!(parse_publication_date("10/01/2024").is_err());
/// ```
pub fn parse_publication_date(text: &str) -> Result<NaiveDate, CoreError> {
    let text = text.trim();
    // chrono accepts unpadded fields for %m/%d; the fixed shape does not.
    let well_shaped = text.len() == 10
        && text
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_shaped {
        return Err(CoreError::Parse(format!(
            "Invalid publication date '{text}': expected YYYY-MM-DD"
        )));
    }

    NaiveDate::parse_from_str(text, PUBLICATION_DATE_FORMAT)
        .map_err(|e| CoreError::Parse(format!("Invalid publication date '{text}': {e}")))
}

/// Validate a single pair. Returns `None` when the pair must be skipped.
pub fn validate_submission(submission: &PublicationSubmission) -> Option<PublicationEntry> {
    let url = submission.url.trim();
    if url.is_empty() || submission.date.trim().is_empty() {
        return None;
    }

    match parse_publication_date(&submission.date) {
        Ok(date) => Some(PublicationEntry {
            url: url.to_string(),
            date,
        }),
        Err(e) => {
            tracing::warn!(url, error = %e, "Skipping publication with invalid date");
            None
        }
    }
}

/// Keep the usable pairs of a submission, in submission order.
pub fn collect_valid(submissions: &[PublicationSubmission]) -> Vec<PublicationEntry> {
    submissions.iter().filter_map(validate_submission).collect()
}

/// Like [`collect_valid`], but refuses a submission that leaves no usable pair.
///
/// An empty submission is a `ConstraintViolation` (the set is required); a
/// non-empty one whose every pair was dropped is a `Parse` error.
pub fn require_valid(
    submissions: &[PublicationSubmission],
) -> Result<Vec<PublicationEntry>, CoreError> {
    if submissions.is_empty() {
        return Err(CoreError::ConstraintViolation(
            "At least one publication URL is required".into(),
        ));
    }

    let entries = collect_valid(submissions);
    if entries.is_empty() {
        return Err(CoreError::Parse(
            "No publication entry has both a URL and a valid YYYY-MM-DD date".into(),
        ));
    }
    Ok(entries)
}
