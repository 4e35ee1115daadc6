mod category;
mod chapters;
pub mod error;
pub mod models;
mod path;
mod schema;

use tracing::instrument;

pub use crate::category::Category;
pub use crate::chapters::{TOTAL_CHAPTERS, chapter_path, is_valid_chapter_id};
use crate::error::{ErrorKind, Result};
pub use crate::error::{FieldViolation, Problem};
pub use crate::path::ManifestPath;
pub use crate::schema::validate;

/// Untyped JSON value produced by [`parse`], before validation.
///
/// Transient by design: the cache only ever holds validated
/// [`models::Manifest`] values, never raw payloads.
pub type RawManifest = serde_json::Value;

/// Parses fetched bytes as strict JSON.
///
/// Accepts raw bytes rather than requiring UTF-8 up front; the JSON
/// parser reports encoding faults the same way it reports syntax
/// faults. No schema checking happens here, see [`validate`] for that.
#[instrument(skip(bytes), fields(payload_size = bytes.as_ref().len()))]
pub fn parse(bytes: impl AsRef<[u8]>) -> Result<RawManifest> {
    Ok(serde_json::from_slice(bytes.as_ref())
        .map_err(|err| ErrorKind::Malformed(err.to_string()))?)
}

/// Every manifest path the content tree is expected to contain: one per
/// chapter id plus one well-known path per asset category.
pub fn all_paths() -> Vec<ManifestPath> {
    let mut paths = Vec::new();
    for id in 0..TOTAL_CHAPTERS {
        if let Some(path) = chapter_path(id) {
            paths.push(path);
        }
    }
    for category in Category::ALL {
        if let Some(path) = category.well_known_path() {
            paths.push(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_json() {
        let raw = parse(br#"{"category": "sounds", "sounds": []}"#).unwrap();
        assert_eq!(raw["category"], "sounds");
    }

    #[test]
    fn parse_rejects_syntax_errors() {
        let err = parse(b"{\"category\": ").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        let err = parse(&[0x22, 0xFF, 0xFE, 0x22]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }

    #[test]
    fn all_paths_covers_chapters_and_categories() {
        let paths = all_paths();
        // Ten chapters plus nine single-file categories.
        assert_eq!(paths.len(), 19);
        assert!(paths.iter().any(|p| p.as_str() == "chapters/chapter-0-the-calling.json"));
        assert!(paths.iter().any(|p| p.as_str() == "enemies.json"));
        assert!(paths.iter().any(|p| p.as_str() == "chapter-plates.json"));
    }
}
