//! Manifest source trait and implementations.
//!
//! This module defines the `ManifestSource` trait, a unified interface for
//! retrieving raw manifest bytes from wherever the content tree lives
//! (local directory, test fixture, remote service).

mod dir;
#[cfg(feature = "mock")]
mod mock;

pub use self::dir::DirSource;
#[cfg(feature = "mock")]
pub use self::mock::MockSource;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for manifest transports.
///
/// A source only moves bytes; parsing and validation happen downstream.
/// All paths are relative to the source root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use grimoire_source::{ManifestSource, error::Result};
///
/// async fn fetch_enemy_catalog(source: &dyn ManifestSource) -> Result<Vec<u8>> {
///     source.fetch(Path::new("enemies.json")).await
/// }
/// ```
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Name of the configured source. Uniqueness is not enforced; the
    /// name only appears in logs.
    fn name(&self) -> &str;

    /// Fetch the raw bytes of a manifest.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if no
    /// manifest exists at `path`, and
    /// [`Unavailable`](crate::error::ErrorKind::Unavailable) when the
    /// transport reports a non-success status. The bytes are returned
    /// as-is, with no caching and no parsing.
    async fn fetch(&self, path: &Path) -> Result<Vec<u8>>;
}
