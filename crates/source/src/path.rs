//! Path validation for manifest keys.
//!
//! Manifest paths come from configuration and static tables, but sources
//! still refuse anything that could escape the content root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a manifest path for use against a source root.
/// Ensures that paths can't escape the root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use grimoire_source::validate_path;
/// // Valid paths
/// assert!(validate_path("enemies.json").is_ok());
/// assert!(validate_path("chapters/chapter-0-the-calling.json").is_ok());
/// assert!(validate_path("a/../enemies.json").is_ok()); // (never leaves the root)
/// // Invalid paths
/// assert!(validate_path("../secrets.json").is_err());
/// assert!(validate_path("a/../../b").is_err()); // (leaves the root)
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("wrong/../still-wrong/.././chapters//./chapter-1-ashfall.json/").unwrap(),
///     Path::new("chapters/chapter-1-ashfall.json")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    // Rust's component parser handles separators, non-UTF8 and platform
    // quirks, so the walk only has to police the component kinds.
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls, reject them explicitly.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            // Drive prefixes never belong in a manifest key.
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}
