//! Chapter manifest loading and synchronous access.
//!
//! Chapters are keyed by numeric id rather than category tag: each id maps to
//! its own path under `chapters/`. Ids are checked against the shipped chapter
//! table before any I/O happens, so an out-of-range id never costs a fetch.

use exn::{OptionExt, ResultExt};
use grimoire_cache::ManifestCache;
use grimoire_manifest::error::ErrorKind as ManifestErrorKind;
use grimoire_manifest::models::{ChapterManifest, Manifest};
use grimoire_manifest::{Category, FieldViolation, ManifestPath, Problem};
use grimoire_source::SourceHandle;
use tracing::{debug, instrument};

use crate::error::{ErrorKind, Result};

pub use grimoire_manifest::{TOTAL_CHAPTERS, chapter_path, is_valid_chapter_id};

/// Loads the manifest for a single chapter, fetching on first use.
///
/// The id is checked against the chapter table before any I/O; a cache hit
/// returns the stored manifest without touching the source. On a miss the
/// payload is fetched, parsed, validated against the chapter schema and
/// cached under its chapter path, so repeating a successful call performs
/// zero further fetches.
///
/// # Errors
/// Returns [`ErrorKind::InvalidChapterId`] for ids outside the chapter table.
/// Pipeline failures ([`ErrorKind::Fetch`], [`ErrorKind::Parse`],
/// [`ErrorKind::Validation`]) are raised wrapped in [`ErrorKind::Chapter`]
/// naming the chapter they belong to.
#[instrument(skip(source, cache))]
pub async fn load_chapter(source: &SourceHandle, cache: &ManifestCache, id: u32) -> Result<ChapterManifest> {
    let path = chapter_path(id).ok_or_raise(|| ErrorKind::InvalidChapterId(id))?;
    if let Some(cached) = cache.get(&path) {
        return chapter_from_cached(&path, id, &cached);
    }
    load_chapter_inner(source, cache, &path, id).await.or_raise(|| ErrorKind::Chapter(id))
}

async fn load_chapter_inner(
    source: &SourceHandle,
    cache: &ManifestCache,
    path: &ManifestPath,
    id: u32,
) -> Result<ChapterManifest> {
    let bytes = source.fetch(path.as_path()).await.or_raise(|| ErrorKind::Fetch)?;
    let raw = grimoire_manifest::parse(&bytes).or_raise(|| ErrorKind::Parse)?;
    let manifest = grimoire_manifest::validate(Category::Chapters, &raw).or_raise(|| ErrorKind::Validation)?;
    let Some(chapter) = manifest.as_chapter() else {
        // validate() only hands back the variant matching the category it was
        // given, so this arm is unreachable unless the schema module regresses.
        exn::bail!(ErrorKind::Validation);
    };
    if chapter.id != id {
        let violation = FieldViolation {
            field: "id".to_owned(),
            problem: Problem::Shape(format!("declares chapter {} but was fetched for chapter {id}", chapter.id)),
        };
        let schema = ManifestErrorKind::Schema { category: Category::Chapters, violations: vec![violation] };
        return Err(exn::Exn::from(schema)).or_raise(|| ErrorKind::Validation);
    }
    let chapter = chapter.clone();
    let digest = blake3::hash(&bytes).to_hex().to_string();
    cache.insert(path.clone(), manifest, digest);
    debug!(path = %path, "chapter manifest loaded");
    Ok(chapter)
}

/// Returns the already-loaded manifest for a chapter without touching the
/// source.
///
/// # Errors
/// Returns [`ErrorKind::InvalidChapterId`] for ids outside the chapter table,
/// [`ErrorKind::NotLoaded`] when the chapter has never been loaded (or was
/// dropped by [`ManifestCache::clear`]), and [`ErrorKind::CorruptedCache`]
/// when the cached value is not the chapter its path promises.
pub fn cached_chapter(cache: &ManifestCache, id: u32) -> Result<ChapterManifest> {
    let path = chapter_path(id).ok_or_raise(|| ErrorKind::InvalidChapterId(id))?;
    let Some(cached) = cache.get(&path) else {
        exn::bail!(ErrorKind::NotLoaded(path));
    };
    chapter_from_cached(&path, id, &cached)
}

fn chapter_from_cached(path: &ManifestPath, id: u32, cached: &Manifest) -> Result<ChapterManifest> {
    match cached.as_chapter() {
        Some(chapter) if chapter.id == id => Ok(chapter.clone()),
        _ => Err(exn::Exn::from(ErrorKind::CorruptedCache(path.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grimoire_manifest::models::EnemiesManifest;
    use grimoire_source::MockSource;
    use serde_json::json;

    use super::*;

    fn chapter_zero_payload() -> String {
        json!({
            "id": 0,
            "name": "The Calling",
            "summary": "A bell tolls over the harbour.",
            "scene": "harbour-gate",
            "soundtrack": "theme-calling",
            "unlocks": ["journal-entry-1"],
        })
        .to_string()
    }

    fn source_with_chapter_zero() -> (SourceHandle, Arc<MockSource>) {
        let mock = Arc::new(MockSource::with_manifests([(
            "chapters/chapter-0-the-calling.json",
            chapter_zero_payload(),
        )]));
        let handle: SourceHandle = mock.clone();
        (handle, mock)
    }

    #[tokio::test]
    async fn test_load_chapter_fetches_and_caches() {
        let (source, _mock) = source_with_chapter_zero();
        let cache = ManifestCache::default();

        let chapter = load_chapter(&source, &cache, 0).await.unwrap();
        assert_eq!(chapter.name, "The Calling");

        let cached = cached_chapter(&cache, 0).unwrap();
        assert_eq!(cached.name, "The Calling");
    }

    #[tokio::test]
    async fn test_load_chapter_is_idempotent() {
        let (source, mock) = source_with_chapter_zero();
        let cache = ManifestCache::default();

        let first = load_chapter(&source, &cache, 0).await.unwrap();
        let second = load_chapter(&source, &cache, 0).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_load_chapter_rejects_out_of_range_id_before_any_fetch() {
        let (source, mock) = source_with_chapter_zero();
        let cache = ManifestCache::default();

        let err = load_chapter(&source, &cache, 10).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidChapterId(10)));
        assert!(err.to_string().contains("Invalid chapter ID: 10"));
        assert_eq!(mock.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_load_chapter_wraps_missing_manifest_in_chapter_context() {
        let source: SourceHandle = Arc::new(MockSource::default());
        let cache = ManifestCache::default();

        let err = load_chapter(&source, &cache, 1).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Chapter(1)));
        assert!(!cache.contains(&chapter_path(1).unwrap()));
    }

    #[tokio::test]
    async fn test_load_chapter_rejects_mismatched_declared_id() {
        let payload = json!({
            "id": 3,
            "name": "The Calling",
            "scene": "harbour-gate",
        })
        .to_string();
        let source: SourceHandle =
            Arc::new(MockSource::with_manifests([("chapters/chapter-0-the-calling.json", payload)]));
        let cache = ManifestCache::default();

        let err = load_chapter(&source, &cache, 0).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Chapter(0)));
        assert!(err.to_string().contains("chapter 0"));
        assert!(!cache.contains(&chapter_path(0).unwrap()));
    }

    #[tokio::test]
    async fn test_cached_chapter_requires_prior_load() {
        let cache = ManifestCache::default();

        let err = cached_chapter(&cache, 0).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotLoaded(_)));
        assert!(err.to_string().contains("not loaded"));
    }

    #[test]
    fn test_cached_chapter_rejects_out_of_range_id() {
        let cache = ManifestCache::default();

        let err = cached_chapter(&cache, 99).unwrap_err();
        assert!(err.to_string().contains("Invalid chapter ID: 99"));
    }

    #[tokio::test]
    async fn test_cached_chapter_rejects_entry_of_wrong_shape() {
        let (source, _mock) = source_with_chapter_zero();
        let cache = ManifestCache::default();

        load_chapter(&source, &cache, 0).await.unwrap();
        let path = chapter_path(0).unwrap();
        let stray = Manifest::Enemies(EnemiesManifest { category: "enemies".to_owned(), enemies: vec![] });
        cache.insert(path.clone(), stray, "0");

        let err = cached_chapter(&cache, 0).unwrap_err();
        assert!(matches!(&*err, ErrorKind::CorruptedCache(p) if p == &path));
    }

    #[tokio::test]
    async fn test_clear_forces_a_refetch() {
        let (source, mock) = source_with_chapter_zero();
        let cache = ManifestCache::default();

        load_chapter(&source, &cache, 0).await.unwrap();
        cache.clear();

        let err = cached_chapter(&cache, 0).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotLoaded(_)));

        load_chapter(&source, &cache, 0).await.unwrap();
        assert_eq!(mock.fetch_count(), 2);
    }
}
