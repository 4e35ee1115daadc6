//! Loader Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Transport and schema errors from the
//! lower crates ride along as children of the kinds declared here.

use derive_more::{Display, Error};
use grimoire_manifest::{Category, ManifestPath};

/// A loading pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies where in the loading pipeline a failure happened.
///
/// Each variant identifies the stage that failed, allowing callers to inspect
/// the error tree without matching on opaque strings.
///
/// ### Caller Errors
/// - [`ErrorKind::InvalidChapterId`]
/// - [`ErrorKind::InvalidCategory`]
/// - [`ErrorKind::NotLoaded`]
///
/// ### Pipeline Errors
/// - [`ErrorKind::Fetch`]
/// - [`ErrorKind::Parse`]
/// - [`ErrorKind::Validation`]
/// - [`ErrorKind::CorruptedCache`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Chapter id outside the shipped chapter table. Rejected before any I/O.
    #[display("Invalid chapter ID: {_0}")]
    InvalidChapterId(#[error(not(source))] u32),
    /// The category has no single catalog manifest. Chapters load per id
    /// through the chapter module, never as a catalog.
    #[display("category '{_0}' is loaded per chapter id, not as a catalog")]
    InvalidCategory(#[error(not(source))] Category),
    /// Context frame naming the chapter a pipeline failure belongs to.
    #[display("failed to load chapter {_0}")]
    Chapter(#[error(not(source))] u32),
    /// The source could not deliver the manifest bytes.
    #[display("failed to fetch manifest from source")]
    Fetch,
    /// The delivered bytes were not parseable JSON.
    #[display("failed to parse manifest payload")]
    Parse,
    /// The payload parsed but did not satisfy its category schema.
    #[display("manifest failed schema validation")]
    Validation,
    /// A sync accessor ran before the manifest was loaded.
    #[display("manifest '{_0}' is not loaded; preload it or load it explicitly first")]
    NotLoaded(#[error(not(source))] ManifestPath),
    /// The cache holds a value of the wrong shape for this path.
    #[display("corrupted cache entry for '{_0}'")]
    CorruptedCache(#[error(not(source))] ManifestPath),
    /// A preload with propagation enabled settled with failures.
    #[display("preload completed with {failed} failed manifest(s)")]
    Preload { failed: usize },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Fetching is the only stage where a second attempt can change the
    /// outcome; everything downstream re-reads the same bytes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch)
    }
}
