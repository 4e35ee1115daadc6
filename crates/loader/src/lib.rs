//! Manifest loading pipeline.
//!
//! Glues the other crates together: bytes come from a
//! [`grimoire_source`] backend, get parsed and validated by
//! [`grimoire_manifest`], and land in a [`grimoire_cache::ManifestCache`]
//! where the synchronous `cached_*` accessors can reach them without I/O.

pub mod category;
pub mod chapter;
pub mod error;
pub mod preload;

/// Upper bound on concurrently in-flight loads during a preload.
pub const MAX_PRELOAD_CONCURRENCY: usize = 8;

pub use crate::category::{cached_category, load_category};
pub use crate::chapter::{cached_chapter, load_chapter};
pub use crate::preload::{PreloadEvent, PreloadFailure, PreloadOptions, PreloadReport, preload, preload_stream};
