//! Upload classification.
//!
//! A listing's uploaded files are either photos or attachments. The kind is
//! decided from the filename extension alone; file contents are never
//! inspected.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Extensions (lowercase, without the dot) classified as photos.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Subdirectory holding a listing's photos.
pub const PHOTOS_DIR: &str = "photos";

/// Subdirectory holding a listing's other attachments.
pub const ATTACHMENTS_DIR: &str = "attachments";

// ---------------------------------------------------------------------------
// File kind
// ---------------------------------------------------------------------------

/// The two categories of files attached to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Photo,
    Attachment,
}

impl FileKind {
    /// Both kinds, in the order their subdirectories are provisioned.
    pub const ALL: [FileKind; 2] = [FileKind::Photo, FileKind::Attachment];

    /// Name of the per-listing subdirectory holding files of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            FileKind::Photo => PHOTOS_DIR,
            FileKind::Attachment => ATTACHMENTS_DIR,
        }
    }
}

/// Classify a filename by extension. Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use maison_core::upload::{classify, FileKind};
///
/// assert_eq!(classify("cover.jpg"), FileKind::Photo);
/// assert_eq!(classify("COVER.JPEG"), FileKind::Photo);
/// assert_eq!(classify("plan.pdf"), FileKind::Attachment);
/// assert_eq!(classify("README"), FileKind::Attachment);
/// ```
pub fn classify(filename: &str) -> FileKind {
    let ext = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return FileKind::Attachment,
    };

    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Photo
    } else {
        FileKind::Attachment
    }
}

/// Shorthand for `classify(filename) == FileKind::Photo`.
pub fn is_photo(filename: &str) -> bool {
    classify(filename) == FileKind::Photo
}
