//! Logical manifest addressing.

use std::path::Path;

/// The logical key identifying a manifest, independent of transport.
///
/// The same key is used both to fetch a manifest from a source and to
/// look it up in the cache, so two loads of the same content always
/// collide on the same entry. Keys are relative (`enemies.json`,
/// `chapters/chapter-0-the-calling.json`); the source decides what root
/// they resolve against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManifestPath(String);

impl ManifestPath {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// View the key as a filesystem path fragment for joining onto a
    /// source root.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for ManifestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ManifestPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<Path> for ManifestPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl From<&str> for ManifestPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ManifestPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
