//! Concurrent manifest preloading.
//!
//! Warms the cache by loading a working set of manifests concurrently: the
//! nine category catalogs plus every shipped chapter by default, or a
//! caller-selected subset. One failed manifest never aborts its siblings;
//! outcomes are collected while the set settles and reported afterwards, so
//! a slow failure cannot interleave its diagnostics with ongoing loads.
//!
//! The primary entry point is [`preload`], which drains [`preload_stream`]
//! into a [`PreloadReport`]. Callers that want live progress (a loading
//! screen, a progress bar) can consume [`preload_stream`] directly.

mod stream;

use exn::ResultExt;
use futures::StreamExt;
use grimoire_cache::ManifestCache;
use grimoire_manifest::{Category, ManifestPath};
use grimoire_source::SourceHandle;
use tracing::{info, instrument, warn};

use crate::error::{Error, ErrorKind, Result};

pub use self::stream::{PreloadEvent, preload_stream};

/// What [`preload`] should load and how it should treat failures.
#[derive(Debug, Clone, Default)]
pub struct PreloadOptions {
    /// Categories to load. `None` means everything: all nine catalogs plus
    /// every shipped chapter.
    pub categories: Option<Vec<Category>>,
    /// Log each loaded path at `info` level once the run settles.
    pub log_progress: bool,
    /// Raise [`ErrorKind::Preload`] after settling if any manifest failed,
    /// instead of absorbing failures into the report.
    pub throw_on_error: bool,
}

/// One failed work item from a settled preload run.
#[derive(Debug)]
pub struct PreloadFailure {
    /// Path of the manifest that failed.
    pub path: ManifestPath,
    /// The error its load raised.
    pub error: Error,
}

/// Outcome of a settled preload run.
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Paths cached by this run, in completion order.
    pub loaded: Vec<ManifestPath>,
    /// Work items that failed.
    pub failed: Vec<PreloadFailure>,
}

impl PreloadReport {
    /// Whether every manifest in the working set made it into the cache.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Preloads the working set and reports once every load has settled.
///
/// Failures never abort the run: each remaining manifest still gets its
/// chance, and the cache ends up holding exactly the successful subset.
/// Logging happens after settling: one `warn!` per absorbed failure, one
/// `info!` per loaded path when
/// [`log_progress`](PreloadOptions::log_progress) is set, and a summary
/// `info!` either way.
///
/// # Errors
/// Only when [`throw_on_error`](PreloadOptions::throw_on_error) is set and
/// at least one manifest failed: the first failure is raised wrapped in
/// [`ErrorKind::Preload`] carrying the failure count. Everything that
/// loaded stays cached even then.
#[instrument(skip(source, cache, options))]
pub async fn preload(
    source: &SourceHandle,
    cache: &ManifestCache,
    options: &PreloadOptions,
) -> Result<PreloadReport> {
    let mut report = PreloadReport::default();
    let mut total = 0;

    let mut events = Box::pin(preload_stream(source, cache, options));
    while let Some(event) = events.next().await {
        match event {
            PreloadEvent::Started { total: size } => total = size,
            PreloadEvent::Loaded { path } => report.loaded.push(path),
            PreloadEvent::Failed { path, error } => report.failed.push(PreloadFailure { path, error }),
            PreloadEvent::Complete => {},
        }
    }

    if options.log_progress {
        for path in &report.loaded {
            info!(path = %path, "manifest preloaded");
        }
    }
    if !options.throw_on_error {
        for failure in &report.failed {
            warn!(
                path = %failure.path,
                error = %failure.error,
                retryable = failure.error.is_retryable(),
                "manifest preload failed"
            );
        }
    }
    info!(loaded = report.loaded.len(), failed = report.failed.len(), total, "preload settled");

    if options.throw_on_error && !report.failed.is_empty() {
        let failed = report.failed.len();
        let first = report.failed.remove(0);
        return Err(first.error).or_raise(|| ErrorKind::Preload { failed });
    }
    Ok(report)
}
