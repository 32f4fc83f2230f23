//! Node name normalization

use crate::error::TreeError;
use unicode_normalization::UnicodeNormalization;

/// Reserved name of the root directory.
pub const ROOT_MARKER: &str = "/";

/// Separator used when rendering paths.
pub const PATH_SEPARATOR: char = '/';

/// Name given to nodes created without one.
pub const PLACEHOLDER_NAME: &str = "?";

/// Canonical form of a name for storage and comparison
///
/// This function:
/// 1. Strips trailing line terminators left over from line-based input
/// 2. Normalizes Unicode to NFC
/// 3. Truncates to `max_len` characters
pub fn canonical_name(name: &str, max_len: usize) -> String {
    name.trim_end_matches(&['\r', '\n'][..])
        .nfc()
        .take(max_len)
        .collect()
}

/// Canonical name for a new node, substituting the placeholder when empty.
pub fn normalize_name(name: Option<&str>, max_len: usize) -> String {
    let canonical = name
        .map(|n| canonical_name(n, max_len))
        .unwrap_or_default();
    if canonical.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        canonical
    }
}

/// Check that a canonical name can sit inside a directory.
///
/// The root marker is reserved and no other name may contain the separator,
/// so every path rendered by `path_of` splits back into its names.
pub fn validate_entry_name(name: &str) -> Result<(), TreeError> {
    if name == ROOT_MARKER {
        return Err(TreeError::ReservedName(name.to_string()));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}
