//! Stored filename convention for uploads.
//!
//! Uploaded files are renamed to `{unix_millis}_{sanitized_basename}` so two
//! uploads sharing an original name never overwrite each other, and no
//! client-supplied name can point outside the listing's directory.

use crate::error::CoreError;

/// Fallback basename when sanitising leaves nothing usable.
const FALLBACK_BASENAME: &str = "file";

/// Maximum length of the sanitised basename (the timestamp prefix is extra).
const MAX_BASENAME_LEN: usize = 120;

/// Reduce a client-supplied filename to a safe basename.
///
/// Only the final path component is kept (both `/` and `\` count as
/// separators). Characters outside `[A-Za-z0-9._-]` become `_`, and leading
/// dots are stripped so the result is never hidden or `..`.
///
/// # Examples
///
/// ```
/// use maison_core::naming::sanitize_basename;
///
/// assert_eq!(sanitize_basename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_basename("C:\\Users\\me\\plan final.pdf"), "plan_final.pdf");
/// assert_eq!(sanitize_basename(".."), "file");
/// ```
pub fn sanitize_basename(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        return FALLBACK_BASENAME.to_string();
    }

    // Keep the extension when truncating so classification is unchanged.
    if trimmed.len() > MAX_BASENAME_LEN {
        if let Some((stem, ext)) = trimmed.rsplit_once('.') {
            if ext.len() < MAX_BASENAME_LEN {
                let keep = MAX_BASENAME_LEN - ext.len() - 1;
                return format!("{}.{ext}", &stem[..keep.min(stem.len())]);
            }
        }
        return trimmed[..MAX_BASENAME_LEN].to_string();
    }

    trimmed.to_string()
}

/// Build the name an upload is stored under.
///
/// # Examples
///
/// ```
/// use maison_core::naming::stored_filename;
///
/// assert_eq!(stored_filename("cover.jpg", 1_704_067_200_000), "1704067200000_cover.jpg");
/// ```
pub fn stored_filename(original: &str, unix_millis: i64) -> String {
    format!("{unix_millis}_{}", sanitize_basename(original))
}

/// Check that `name` is a plain file name that can be joined onto a listing
/// directory: non-empty, no separators, not `.` or `..`.
pub fn validate_plain_filename(name: &str) -> Result<(), CoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(CoreError::ConstraintViolation(format!(
            "Invalid file name '{name}'"
        )));
    }
    Ok(())
}
