//! End-to-end preload over a real directory tree.
//!
//! Wires the settings layer to a [`DirSource`], preloads the full working
//! set, and reads the results back through the synchronous accessors.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use grimoire_cache::ManifestCache;
use grimoire_config::Settings;
use grimoire_loader::chapter::cached_chapter;
use grimoire_loader::error::ErrorKind;
use grimoire_loader::preload::{PreloadOptions, preload};
use grimoire_loader::{cached_category, category};
use grimoire_manifest::{Category, TOTAL_CHAPTERS, chapter_path};
use grimoire_source::{DirSource, SourceHandle};
use serde_json::json;
use tempfile::TempDir;

fn catalog_payload(category: Category) -> String {
    match category {
        Category::Enemies => json!({
            "category": "enemies",
            "enemies": [{
                "id": "cave-slime",
                "name": "Cave Slime",
                "sprite": "slime",
                "health": 20,
                "speed": 0.5,
                "behavior": "patrol",
            }],
        }),
        Category::Npcs => json!({
            "category": "npcs",
            "species": {"human": {"sprite": "human"}},
            "npcs": [{"id": "harbourmaster", "name": "The Harbourmaster", "species": "human"}],
        }),
        Category::Sprites => json!({"category": "sprites", "sprites": []}),
        Category::Cinematics => json!({"category": "cinematics", "cinematics": []}),
        Category::Sounds => json!({
            "category": "sounds",
            "sounds": [{"id": "bell-toll", "path": "audio/bell-toll.ogg"}],
        }),
        Category::Effects => json!({"category": "effects", "effects": []}),
        Category::Items => json!({"category": "items", "items": []}),
        Category::Scenes => json!({"category": "scenes", "scenes": []}),
        Category::ChapterPlates => json!({"category": "chapter-plates", "plates": []}),
        Category::Chapters => unreachable!("chapters have no catalog"),
    }
    .to_string()
}

fn chapter_payload(id: u32) -> String {
    let name = if id == 0 { "The Calling".to_owned() } else { format!("Chapter {id}") };
    json!({"id": id, "name": name, "scene": format!("scene-{id}")}).to_string()
}

/// Writes every known manifest into `root`, mirroring a shipped content tree.
fn write_content_tree(root: &Path) {
    for category in Category::ALL {
        let Some(path) = category.well_known_path() else {
            continue;
        };
        fs::write(root.join(path.as_path()), catalog_payload(category)).unwrap();
    }
    fs::create_dir_all(root.join("chapters")).unwrap();
    for id in 0..TOTAL_CHAPTERS {
        let path = chapter_path(id).unwrap();
        fs::write(root.join(path.as_path()), chapter_payload(id)).unwrap();
    }
}

#[tokio::test]
async fn preload_via_settings_warms_the_sync_accessors() {
    let tmp = TempDir::new().unwrap();
    let content_root = tmp.path().join("content");
    fs::create_dir_all(&content_root).unwrap();
    write_content_tree(&content_root);

    let settings_file = tmp.path().join("grimoire.toml");
    fs::write(
        &settings_file,
        format!("[source]\nroot = \"{}\"\n\n[preload]\nlog_progress = true\n", content_root.display()),
    )
    .unwrap();

    let settings = Settings::from_file(&settings_file).unwrap();
    assert_eq!(settings.source.root, content_root);

    let source: SourceHandle = Arc::new(DirSource::new("content", &settings.source.root).unwrap());
    let cache = ManifestCache::default();
    let options = PreloadOptions {
        categories: settings.preload.selection().unwrap(),
        log_progress: settings.preload.log_progress,
        throw_on_error: settings.preload.throw_on_error,
    };

    let report = preload(&source, &cache, &options).await.unwrap();
    assert!(report.is_complete(), "unexpected failures: {:?}", report.failed);

    let expected = Category::ALL.len() - 1 + TOTAL_CHAPTERS as usize;
    assert_eq!(report.loaded.len(), expected);
    assert_eq!(cache.stats().size, expected);

    // Everything is now reachable without touching the source again.
    let chapter = cached_chapter(&cache, 0).unwrap();
    assert_eq!(chapter.name, "The Calling");
    let enemies = category::cached_enemies(&cache).unwrap();
    assert_eq!(enemies.enemies.len(), 1);
    let npcs = category::cached_npcs(&cache).unwrap();
    assert_eq!(npcs.npcs[0].species, "human");
    for category in Category::ALL {
        let Some(path) = category.well_known_path() else {
            continue;
        };
        let info = cache.entry_info(&path).unwrap();
        assert!(!info.content_hash.is_empty());
        assert!(cached_category(&cache, category).is_ok());
    }

    // A cleared cache voids every sync-accessor guarantee until the next
    // preload.
    cache.clear();
    let err = cached_chapter(&cache, 0).unwrap_err();
    assert!(matches!(&*err, ErrorKind::NotLoaded(_)));
}

#[tokio::test]
async fn preload_against_missing_tree_reports_every_path() {
    let tmp = TempDir::new().unwrap();
    let content_root = tmp.path().join("empty");
    fs::create_dir_all(&content_root).unwrap();

    let source: SourceHandle = Arc::new(DirSource::new("content", &content_root).unwrap());
    let cache = ManifestCache::default();

    let report = preload(&source, &cache, &PreloadOptions::default()).await.unwrap();
    let expected = Category::ALL.len() - 1 + TOTAL_CHAPTERS as usize;
    assert_eq!(report.failed.len(), expected);
    assert!(report.loaded.is_empty());
    assert_eq!(cache.stats().size, 0);
}
