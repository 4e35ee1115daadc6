//! Category catalog loading and synchronous access.
//!
//! Every asset category except chapters ships a single catalog manifest at a
//! well-known path (`enemies.json`, `npcs.json`, ...). The generic
//! [`load_category`]/[`cached_category`] pair does the actual work; the typed
//! wrappers project the payload type for call sites that know what they want.

use std::sync::Arc;

use exn::{OptionExt, ResultExt};
use grimoire_cache::ManifestCache;
use grimoire_manifest::models::{
    ChapterPlatesManifest, CinematicsManifest, EffectsManifest, EnemiesManifest, ItemsManifest, Manifest,
    NpcsManifest, ScenesManifest, SoundsManifest, SpritesManifest,
};
use grimoire_manifest::{Category, ManifestPath};
use grimoire_source::SourceHandle;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};

/// Loads the catalog manifest for an asset category, fetching on first use.
///
/// A cache hit returns the stored manifest without touching the source. On a
/// miss the payload is fetched from the category's well-known path, parsed,
/// validated against the category schema and cached, so repeating a
/// successful call performs zero further fetches. The returned handle is
/// shared with the cache; cloning it is free.
///
/// # Errors
/// Returns [`ErrorKind::InvalidCategory`] for [`Category::Chapters`], which
/// has no catalog path, and the failing pipeline stage ([`ErrorKind::Fetch`],
/// [`ErrorKind::Parse`], [`ErrorKind::Validation`]) otherwise.
#[instrument(skip_all, fields(category = %category))]
pub async fn load_category(
    source: &SourceHandle,
    cache: &ManifestCache,
    category: Category,
) -> Result<Arc<Manifest>> {
    let path = category.well_known_path().ok_or_raise(|| ErrorKind::InvalidCategory(category))?;
    if let Some(cached) = cache.get(&path) {
        return category_from_cached(&path, category, cached);
    }
    let bytes = source.fetch(path.as_path()).await.or_raise(|| ErrorKind::Fetch)?;
    let raw = grimoire_manifest::parse(&bytes).or_raise(|| ErrorKind::Parse)?;
    let manifest = grimoire_manifest::validate(category, &raw).or_raise(|| ErrorKind::Validation)?;
    let digest = blake3::hash(&bytes).to_hex().to_string();
    let stored = cache.insert(path.clone(), manifest, digest);
    debug!(path = %path, "category manifest loaded");
    Ok(stored)
}

/// Returns the already-loaded catalog for a category without touching the
/// source.
///
/// # Errors
/// Returns [`ErrorKind::InvalidCategory`] for [`Category::Chapters`],
/// [`ErrorKind::NotLoaded`] when the catalog has never been loaded (or was
/// dropped by [`ManifestCache::clear`]), and [`ErrorKind::CorruptedCache`]
/// when the cached value is not the category its path promises.
pub fn cached_category(cache: &ManifestCache, category: Category) -> Result<Arc<Manifest>> {
    let path = category.well_known_path().ok_or_raise(|| ErrorKind::InvalidCategory(category))?;
    let Some(cached) = cache.get(&path) else {
        exn::bail!(ErrorKind::NotLoaded(path));
    };
    category_from_cached(&path, category, cached)
}

fn category_from_cached(path: &ManifestPath, category: Category, cached: Arc<Manifest>) -> Result<Arc<Manifest>> {
    if cached.category() == category {
        Ok(cached)
    } else {
        Err(exn::Exn::from(ErrorKind::CorruptedCache(path.clone())))
    }
}

fn drifted(category: Category) -> Error {
    // well_known_path is Some for every catalog category.
    let path = category.well_known_path().unwrap_or_else(|| ManifestPath::new(format!("{category}.json")));
    exn::Exn::from(ErrorKind::CorruptedCache(path))
}

/// Loads the enemy catalog, fetching on first use.
pub async fn load_enemies(source: &SourceHandle, cache: &ManifestCache) -> Result<EnemiesManifest> {
    let manifest = load_category(source, cache, Category::Enemies).await?;
    manifest.as_enemies().cloned().ok_or_else(|| drifted(Category::Enemies))
}

/// Returns the already-loaded enemy catalog without touching the source.
pub fn cached_enemies(cache: &ManifestCache) -> Result<EnemiesManifest> {
    let manifest = cached_category(cache, Category::Enemies)?;
    manifest.as_enemies().cloned().ok_or_else(|| drifted(Category::Enemies))
}

/// Loads the NPC catalog, fetching on first use.
pub async fn load_npcs(source: &SourceHandle, cache: &ManifestCache) -> Result<NpcsManifest> {
    let manifest = load_category(source, cache, Category::Npcs).await?;
    manifest.as_npcs().cloned().ok_or_else(|| drifted(Category::Npcs))
}

/// Returns the already-loaded NPC catalog without touching the source.
pub fn cached_npcs(cache: &ManifestCache) -> Result<NpcsManifest> {
    let manifest = cached_category(cache, Category::Npcs)?;
    manifest.as_npcs().cloned().ok_or_else(|| drifted(Category::Npcs))
}

/// Loads the sprite atlas catalog, fetching on first use.
pub async fn load_sprites(source: &SourceHandle, cache: &ManifestCache) -> Result<SpritesManifest> {
    let manifest = load_category(source, cache, Category::Sprites).await?;
    manifest.as_sprites().cloned().ok_or_else(|| drifted(Category::Sprites))
}

/// Returns the already-loaded sprite atlas catalog without touching the source.
pub fn cached_sprites(cache: &ManifestCache) -> Result<SpritesManifest> {
    let manifest = cached_category(cache, Category::Sprites)?;
    manifest.as_sprites().cloned().ok_or_else(|| drifted(Category::Sprites))
}

/// Loads the cinematic catalog, fetching on first use.
pub async fn load_cinematics(source: &SourceHandle, cache: &ManifestCache) -> Result<CinematicsManifest> {
    let manifest = load_category(source, cache, Category::Cinematics).await?;
    manifest.as_cinematics().cloned().ok_or_else(|| drifted(Category::Cinematics))
}

/// Returns the already-loaded cinematic catalog without touching the source.
pub fn cached_cinematics(cache: &ManifestCache) -> Result<CinematicsManifest> {
    let manifest = cached_category(cache, Category::Cinematics)?;
    manifest.as_cinematics().cloned().ok_or_else(|| drifted(Category::Cinematics))
}

/// Loads the sound catalog, fetching on first use.
pub async fn load_sounds(source: &SourceHandle, cache: &ManifestCache) -> Result<SoundsManifest> {
    let manifest = load_category(source, cache, Category::Sounds).await?;
    manifest.as_sounds().cloned().ok_or_else(|| drifted(Category::Sounds))
}

/// Returns the already-loaded sound catalog without touching the source.
pub fn cached_sounds(cache: &ManifestCache) -> Result<SoundsManifest> {
    let manifest = cached_category(cache, Category::Sounds)?;
    manifest.as_sounds().cloned().ok_or_else(|| drifted(Category::Sounds))
}

/// Loads the effect catalog, fetching on first use.
pub async fn load_effects(source: &SourceHandle, cache: &ManifestCache) -> Result<EffectsManifest> {
    let manifest = load_category(source, cache, Category::Effects).await?;
    manifest.as_effects().cloned().ok_or_else(|| drifted(Category::Effects))
}

/// Returns the already-loaded effect catalog without touching the source.
pub fn cached_effects(cache: &ManifestCache) -> Result<EffectsManifest> {
    let manifest = cached_category(cache, Category::Effects)?;
    manifest.as_effects().cloned().ok_or_else(|| drifted(Category::Effects))
}

/// Loads the item catalog, fetching on first use.
pub async fn load_items(source: &SourceHandle, cache: &ManifestCache) -> Result<ItemsManifest> {
    let manifest = load_category(source, cache, Category::Items).await?;
    manifest.as_items().cloned().ok_or_else(|| drifted(Category::Items))
}

/// Returns the already-loaded item catalog without touching the source.
pub fn cached_items(cache: &ManifestCache) -> Result<ItemsManifest> {
    let manifest = cached_category(cache, Category::Items)?;
    manifest.as_items().cloned().ok_or_else(|| drifted(Category::Items))
}

/// Loads the scene catalog, fetching on first use.
pub async fn load_scenes(source: &SourceHandle, cache: &ManifestCache) -> Result<ScenesManifest> {
    let manifest = load_category(source, cache, Category::Scenes).await?;
    manifest.as_scenes().cloned().ok_or_else(|| drifted(Category::Scenes))
}

/// Returns the already-loaded scene catalog without touching the source.
pub fn cached_scenes(cache: &ManifestCache) -> Result<ScenesManifest> {
    let manifest = cached_category(cache, Category::Scenes)?;
    manifest.as_scenes().cloned().ok_or_else(|| drifted(Category::Scenes))
}

/// Loads the chapter plate catalog, fetching on first use.
pub async fn load_chapter_plates(source: &SourceHandle, cache: &ManifestCache) -> Result<ChapterPlatesManifest> {
    let manifest = load_category(source, cache, Category::ChapterPlates).await?;
    manifest.as_chapter_plates().cloned().ok_or_else(|| drifted(Category::ChapterPlates))
}

/// Returns the already-loaded chapter plate catalog without touching the source.
pub fn cached_chapter_plates(cache: &ManifestCache) -> Result<ChapterPlatesManifest> {
    let manifest = cached_category(cache, Category::ChapterPlates)?;
    manifest.as_chapter_plates().cloned().ok_or_else(|| drifted(Category::ChapterPlates))
}
