use async_stream::stream;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use grimoire_cache::ManifestCache;
use grimoire_manifest::{Category, ManifestPath, TOTAL_CHAPTERS, chapter_path};
use grimoire_source::SourceHandle;

use crate::MAX_PRELOAD_CONCURRENCY;
use crate::category::load_category;
use crate::chapter::load_chapter;
use crate::error::Error;
use crate::preload::PreloadOptions;

/// Progress events emitted by [`preload_stream`] as the working set settles.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once, carrying the working set
///    size.
/// 2. [`Loaded`](Self::Loaded) / [`Failed`](Self::Failed), exactly `total`
///    times, one per manifest. Completion order is unspecified.
/// 3. [`Complete`](Self::Complete), exactly once, signalling the stream is
///    finished.
///
/// A failed manifest never terminates the stream; the error rides on the
/// [`Failed`](Self::Failed) event and the remaining manifests keep going.
#[derive(Debug)]
pub enum PreloadEvent {
    /// Preloading has begun; emitted exactly once before any other event.
    Started {
        /// Number of manifests in the working set.
        total: usize,
    },
    /// A manifest was fetched, validated and cached.
    Loaded {
        /// Path the manifest is now cached under.
        path: ManifestPath,
    },
    /// A manifest could not be loaded.
    Failed {
        /// Path of the manifest that failed.
        path: ManifestPath,
        /// The error its load raised.
        error: Error,
    },
    /// Every manifest in the working set has settled; the stream is finished.
    Complete,
}

enum PreloadTask {
    Chapter(u32),
    Catalog(Category),
}

/// Resolves the categories in `options` to concrete work items.
///
/// `None` selects everything. The chapters category has no catalog manifest,
/// so it expands to one work item per shipped chapter.
fn working_set(options: &PreloadOptions) -> Vec<(ManifestPath, PreloadTask)> {
    let categories = match &options.categories {
        Some(picked) => picked.clone(),
        None => Category::ALL.to_vec(),
    };
    let mut tasks = Vec::new();
    for category in categories {
        match category.well_known_path() {
            Some(path) => tasks.push((path, PreloadTask::Catalog(category))),
            None => {
                tasks.extend((0..TOTAL_CHAPTERS).filter_map(|id| Some((chapter_path(id)?, PreloadTask::Chapter(id)))));
            },
        }
    }
    tasks
}

async fn preload_one(
    source: &SourceHandle,
    cache: &ManifestCache,
    path: ManifestPath,
    task: PreloadTask,
) -> PreloadEvent {
    let outcome = match task {
        PreloadTask::Chapter(id) => load_chapter(source, cache, id).await.map(|_| ()),
        PreloadTask::Catalog(category) => load_category(source, cache, category).await.map(|_| ()),
    };
    match outcome {
        Ok(()) => PreloadEvent::Loaded { path },
        Err(error) => PreloadEvent::Failed { path, error },
    }
}

/// Streams [`PreloadEvent`]s while loading the working set selected by
/// `options` into `cache`.
///
/// Up to `MAX_PRELOAD_CONCURRENCY` (8) loads run at a time; additional
/// manifests are promoted as in-flight loads settle. The stream yields
/// events in the order documented on [`PreloadEvent`]. Individual failures
/// are surfaced as [`PreloadEvent::Failed`] without terminating the stream,
/// so the cache always ends up holding exactly the successful subset.
pub fn preload_stream<'a>(
    source: &'a SourceHandle,
    cache: &'a ManifestCache,
    options: &'a PreloadOptions,
) -> impl Stream<Item = PreloadEvent> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        let tasks = working_set(options);
        yield PreloadEvent::Started { total: tasks.len() };

        let mut futures: Vec<_> =
            tasks.into_iter().map(|(path, task)| preload_one(source, cache, path, task)).collect();
        let mut settling = FuturesUnordered::new();
        settling.extend(futures.drain(..MAX_PRELOAD_CONCURRENCY.min(futures.len())));
        while let Some(event) = settling.next().await {
            yield event;
            // Pop-n-push, but FIFO instead of LIFO.
            if !futures.is_empty() {
                settling.push(futures.remove(0));
            }
        }

        yield PreloadEvent::Complete;
    })
}
