//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No manifest exists at the requested path
    #[display("manifest not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The transport answered with a non-success status
    #[display("source unavailable for {} (status {status})", path.display())]
    Unavailable { path: PathBuf, status: u16 },
    /// Access denied (permissions or credentials)
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Path contains invalid characters or escapes the source root
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Any other transport fault
    #[display("transport error: {_0}")]
    Transport(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}
impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Io(_) | Self::Transport(_))
    }
}
