//! Local directory manifest source.
//!
//! Reads manifests straight off the filesystem via `tokio::fs`, rooted at
//! a configured content directory.

use crate::{ManifestSource, error::ErrorKind, error::Result, path::validate as validate_path};
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::trace;

/// Filesystem manifest source.
///
/// Serves manifests from a directory on the local filesystem. All paths
/// are relative to the configured root directory.
///
/// # Examples
///
/// ```no_run
/// use grimoire_source::DirSource;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = DirSource::new("local", "/srv/game/manifests")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DirSource {
    name: String,
    /// Root directory of the content tree
    root: PathBuf,
}
impl DirSource {
    /// Create a new directory source.
    ///
    /// # Arguments
    /// * `root` - Absolute path to the content tree root
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists but is
    /// not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }

        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Use non-async here; it'll only happen once on startup and
            // it's not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }

        Ok(Self { name: name.into(), root })
    }

    /// Get the absolute path for a relative manifest path.
    ///
    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl ManifestSource for DirSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        let data = fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        trace!(source = self.name, path = %path.display(), bytes = data.len(), "fetched manifest");
        Ok(data)
    }
}
