pub mod backend;
pub mod error;
mod path;

pub use crate::backend::DirSource;
pub use crate::backend::ManifestSource;
#[cfg(feature = "mock")]
pub use crate::backend::MockSource;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

/// Shared handle to a configured manifest source.
pub type SourceHandle = Arc<dyn ManifestSource + Send + Sync>;
