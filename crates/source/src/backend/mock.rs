//! In-memory manifest source for testing.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::ManifestSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory manifest source for testing.
///
/// Manifests live in a `HashMap` behind a [`RwLock`], so the trait
/// methods operate on `&self` without external synchronisation. Every
/// call to [`fetch`](ManifestSource::fetch) that reaches the transport
/// is counted, which lets tests assert how many fetches a code path
/// actually performed.
///
/// # Examples
///
/// ```
/// use grimoire_source::{ManifestSource, backend::MockSource};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MockSource::with_manifests([
///     ("enemies.json", br#"{"category": "enemies", "enemies": []}"#),
/// ]);
/// let data = source.fetch(Path::new("enemies.json")).await?;
/// assert_eq!(source.fetch_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockSource {
    name: String,
    manifests: RwLock<HashMap<PathBuf, Vec<u8>>>,
    /// Paths that answer with a transport status instead of bytes.
    refusals: HashMap<PathBuf, u16>,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Create a mock source pre-populated with manifests.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then the test should not pass.
    ///
    /// # Example
    ///
    /// ```
    /// use grimoire_source::backend::MockSource;
    ///
    /// let source = MockSource::with_manifests([
    ///     ("enemies.json", br#"{"category": "enemies", "enemies": []}"#.as_slice()),
    ///     ("chapters/chapter-0-the-calling.json", br#"{"id": 0}"#.as_slice()),
    /// ]);
    /// ```
    pub fn with_manifests(
        manifests: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>,
    ) -> Self {
        let mut map = HashMap::new();
        for (path, data) in manifests {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                // The panic here is DELIBERATE. MockSource is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockSource::with_manifests: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            manifests: RwLock::new(map),
            refusals: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Change the name of the mock source.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make a path answer with a transport status instead of content.
    ///
    /// Panics on an invalid path, same as [`with_manifests`](Self::with_manifests).
    ///
    /// # Example
    ///
    /// ```
    /// use grimoire_source::backend::MockSource;
    ///
    /// let source = MockSource::default().with_refusal("enemies.json", 404);
    /// ```
    pub fn with_refusal(mut self, path: impl Into<PathBuf>, status: u16) -> Self {
        let path = path.into();
        let Ok(validated) = validate_path(&path) else {
            panic!("MockSource::with_refusal: invalid path {}", path.display());
        };
        self.refusals.insert(validated, status);
        self
    }

    /// Add or replace a manifest after construction.
    ///
    /// Panics on an invalid path, same as [`with_manifests`](Self::with_manifests).
    pub async fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        let Ok(validated) = validate_path(&path) else {
            panic!("MockSource::insert: invalid path {}", path.display());
        };
        self.manifests.write().await.insert(validated, data.into());
    }

    /// Number of fetches that reached the transport so far, successful
    /// or not. Rejected paths are not counted; no request was formed.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}
impl Default for MockSource {
    fn default() -> Self {
        let manifests: [(&str, &[u8]); 0] = [];
        Self::with_manifests(manifests)
    }
}

#[async_trait]
impl ManifestSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Some(status) = self.refusals.get(&path) {
            exn::bail!(ErrorKind::Unavailable { path, status: *status });
        }
        let data = self
            .manifests
            .read()
            .await
            .get(&path)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))?;
        Ok(data)
    }
}
