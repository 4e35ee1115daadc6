//! In-memory store for validated manifests.
//!
//! This crate holds the process's loaded content: the cache is the sole
//! source of truth for "this manifest is loaded". It is not persistent and
//! is not the source of truth for content itself; the manifest files are.
//! If the cache is cleared, everything can be reloaded from the source.
//!
//! The cache never validates. It trusts the values handed to it, which is
//! why only validated [`Manifest`] values are allowed in: the loader
//! validates first and inserts second, so an entry's existence implies its
//! payload passed its schema at load time.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use grimoire_manifest::models::Manifest;
use grimoire_manifest::ManifestPath;
use time::UtcDateTime;
use tracing::{debug, trace};

struct CacheEntry {
    manifest: Arc<Manifest>,
    loaded_at: UtcDateTime,
    /// BLAKE3 hex digest of the raw bytes the manifest was parsed from.
    content_hash: String,
}

/// Cache introspection snapshot, intended for test harnesses, tooling
/// and hot-reload workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached manifests.
    pub size: usize,
    /// Every cached path, sorted for stable output.
    pub keys: Vec<ManifestPath>,
}

/// Provenance details for a single cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// When the entry was inserted.
    pub loaded_at: UtcDateTime,
    /// BLAKE3 hex digest of the raw bytes the manifest was parsed from.
    pub content_hash: String,
}

/// Process-wide map from manifest path to validated manifest.
///
/// Instantiable rather than global: tests and tools can run any number
/// of isolated caches side by side. Entries are written once per path on
/// first successful load and live until [`clear`](Self::clear); there is
/// no per-key eviction. Reads are plain lock-guarded map lookups with no
/// I/O and nothing async, so post-preload accessors stay synchronous.
#[derive(Default)]
pub struct ManifestCache {
    entries: RwLock<HashMap<ManifestPath, CacheEntry>>,
}

impl ManifestCache {
    /// Create an empty cache, equivalent to process-start state.
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means some other thread panicked while
    // holding it; the map itself is still intact, so keep serving.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<ManifestPath, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<ManifestPath, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a validated manifest under its path, returning the shared
    /// handle now held by the cache.
    ///
    /// Overwrites any previous entry for the same path: two concurrent
    /// loads of one key both validate and both insert, and the last
    /// write wins. Both writes carry equivalent values, so the race is
    /// harmless.
    pub fn insert(&self, path: ManifestPath, manifest: Manifest, content_hash: impl Into<String>) -> Arc<Manifest> {
        let manifest = Arc::new(manifest);
        let entry = CacheEntry {
            manifest: Arc::clone(&manifest),
            loaded_at: UtcDateTime::now(),
            content_hash: content_hash.into(),
        };
        trace!(path = %path, "caching manifest");
        self.write_entries().insert(path, entry);
        manifest
    }

    /// Fetch a cached manifest. Zero I/O; never suspends.
    pub fn get(&self, path: &ManifestPath) -> Option<Arc<Manifest>> {
        self.read_entries().get(path).map(|entry| Arc::clone(&entry.manifest))
    }

    /// Whether a manifest is loaded for this path.
    pub fn contains(&self, path: &ManifestPath) -> bool {
        self.read_entries().contains_key(path)
    }

    /// Provenance for a cached entry, if present.
    pub fn entry_info(&self, path: &ManifestPath) -> Option<EntryInfo> {
        self.read_entries().get(path).map(|entry| EntryInfo {
            loaded_at: entry.loaded_at,
            content_hash: entry.content_hash.clone(),
        })
    }

    /// Drop every entry, returning the cache to process-start state.
    ///
    /// Every sync-accessor guarantee made so far is void afterwards;
    /// callers must preload again before reading.
    pub fn clear(&self) {
        let mut entries = self.write_entries();
        debug!(dropped = entries.len(), "clearing manifest cache");
        entries.clear();
    }

    /// Snapshot of the cache contents.
    pub fn stats(&self) -> CacheStats {
        let entries = self.read_entries();
        let mut keys: Vec<ManifestPath> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats { size: keys.len(), keys }
    }
}

#[cfg(test)]
mod tests {
    use grimoire_manifest::models::SpritesManifest;
    use grimoire_manifest::{validate, Category};

    use super::*;

    fn sounds_manifest() -> Manifest {
        let raw = serde_json::json!({
            "category": "sounds",
            "sounds": [{ "id": "bell", "path": "audio/bell.ogg" }],
        });
        validate(Category::Sounds, &raw).unwrap()
    }

    fn sprites_manifest() -> Manifest {
        Manifest::Sprites(SpritesManifest { category: "sprites".to_owned(), sprites: vec![] })
    }

    #[test]
    fn starts_empty() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        assert!(!cache.contains(&path));
        assert!(cache.get(&path).is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        cache.insert(path.clone(), sounds_manifest(), "abc123");
        assert!(cache.contains(&path));
        let cached = cache.get(&path).unwrap();
        assert_eq!(cached.category(), Category::Sounds);
    }

    #[test]
    fn get_shares_one_allocation() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        cache.insert(path.clone(), sounds_manifest(), "abc123");
        let first = cache.get(&path).unwrap();
        let second = cache.get(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn insert_overwrites_previous_entry() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        cache.insert(path.clone(), sounds_manifest(), "first");
        cache.insert(path.clone(), sounds_manifest(), "second");
        assert_eq!(cache.stats().size, 1);
        assert_eq!(cache.entry_info(&path).unwrap().content_hash, "second");
    }

    #[test]
    fn clear_resets_to_process_start() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        cache.insert(path.clone(), sounds_manifest(), "abc123");
        cache.clear();
        assert!(!cache.contains(&path));
        assert_eq!(cache.stats(), CacheStats { size: 0, keys: vec![] });
    }

    #[test]
    fn stats_keys_are_sorted() {
        let cache = ManifestCache::new();
        cache.insert(ManifestPath::new("sprites.json"), sprites_manifest(), "a");
        cache.insert(ManifestPath::new("sounds.json"), sounds_manifest(), "b");
        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys[0].as_str(), "sounds.json");
        assert_eq!(stats.keys[1].as_str(), "sprites.json");
    }

    #[test]
    fn entry_info_reports_provenance() {
        let cache = ManifestCache::new();
        let path = ManifestPath::new("sounds.json");
        assert!(cache.entry_info(&path).is_none());
        let before = UtcDateTime::now();
        cache.insert(path.clone(), sounds_manifest(), "deadbeef");
        let info = cache.entry_info(&path).unwrap();
        assert_eq!(info.content_hash, "deadbeef");
        assert!(info.loaded_at >= before);
    }
}
