//! Content verification tool for manifest trees.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use grimoire_cache::ManifestCache;
use grimoire_config::Settings;
use grimoire_loader::preload::{PreloadOptions, preload};
use grimoire_manifest::Category;
use grimoire_source::{DirSource, SourceHandle};
use miette::{IntoDiagnostic, miette};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `exn::Exn` does not implement `std::error::Error` (only its boxed frame
/// does), so it cannot feed `into_diagnostic` directly; this adapter wraps the
/// frame and delegates `Display` and `source`.
#[derive(Debug)]
struct ExnError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl ExnError {
    fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ExnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ExnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

#[derive(Parser)]
#[command(author, version, about = "Game content manifest tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every selected manifest from a content tree and report on each
    Check {
        /// Content tree to check instead of the configured source root
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Restrict the check to these categories (repeatable)
        #[arg(long = "category", value_name = "TAG")]
        categories: Vec<String>,
        /// Exit non-zero if any manifest failed
        #[arg(long)]
        strict: bool,
    },
    /// Print every known manifest path
    Paths,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { root, categories, strict } => check(root, categories, strict).await,
        Command::Paths => paths(),
    }
}

async fn check(root: Option<PathBuf>, tags: Vec<String>, strict: bool) -> miette::Result<()> {
    let settings = Settings::load().map_err(ExnError::new).into_diagnostic()?;
    let root = std::path::absolute(root.unwrap_or(settings.source.root)).into_diagnostic()?;
    let categories = if tags.is_empty() {
        settings.preload.selection().map_err(ExnError::new).into_diagnostic()?
    } else {
        let mut picked = Vec::with_capacity(tags.len());
        for tag in &tags {
            picked.push(tag.parse::<Category>().map_err(ExnError::new).into_diagnostic()?);
        }
        Some(picked)
    };
    info!(root = %root.display(), "checking content tree");

    let source: SourceHandle =
        Arc::new(DirSource::new("content", &root).map_err(ExnError::new).into_diagnostic()?);
    let cache = ManifestCache::default();
    let options = PreloadOptions { categories, log_progress: false, throw_on_error: false };
    let report = preload(&source, &cache, &options).await.map_err(ExnError::new).into_diagnostic()?;

    let mut rows = Vec::with_capacity(report.loaded.len() + report.failed.len());
    for path in &report.loaded {
        let hash = cache.entry_info(path).map(|info| info.content_hash).unwrap_or_default();
        let short = hash.get(..12).unwrap_or(&hash);
        rows.push(format!("ok    {path}  {short}"));
    }
    for failure in &report.failed {
        rows.push(format!("fail  {}  {}", failure.path, failure.error));
    }
    rows.sort();
    for row in &rows {
        println!("{row}");
    }
    println!("{} loaded, {} failed", report.loaded.len(), report.failed.len());

    if strict && !report.is_complete() {
        return Err(miette!("{} manifest(s) failed verification", report.failed.len()));
    }
    Ok(())
}

fn paths() -> miette::Result<()> {
    for path in grimoire_manifest::all_paths() {
        println!("{path}");
    }
    Ok(())
}
