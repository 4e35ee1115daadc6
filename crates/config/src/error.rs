//! Settings Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A settings error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A configured tag does not name any manifest category
    #[display("unknown manifest category '{_0}' in settings")]
    UnknownCategory(#[error(not(source))] String),
    /// Figment could not assemble or deserialize the layered profile
    #[display("failed to assemble settings")]
    Figment,
    /// The assembled settings are internally inconsistent
    #[display("invalid settings")]
    Invalid,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Settings are read from local files and the environment; a retry reads
    /// the same values.
    pub fn is_retryable(&self) -> bool {
        match self {
            _ => false,
        }
    }
}
