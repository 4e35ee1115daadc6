//! Layered runtime settings.
//!
//! Settings are assembled from three layers, each overriding the one below:
//! built-in defaults, a `grimoire.toml` file (an explicit path, or the
//! user's project config directory), and `GRIMOIRE_*` environment variables
//! with `__` separating nested keys, e.g.
//! `GRIMOIRE_PRELOAD__LOG_PROGRESS=true`.
//!
//! Category tags configured for preloading are checked against the known
//! categories at load time, so a typo surfaces on startup rather than as a
//! mysteriously skipped manifest later.

pub mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use grimoire_manifest::Category;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, Result};

/// Name of the settings file looked up in the project config directory.
pub const SETTINGS_FILE: &str = "grimoire.toml";
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "GRIMOIRE_";

/// Assembled runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Where manifests are served from.
    pub source: SourceSettings,
    /// What the startup preload should do.
    pub preload: PreloadSettings,
}

/// Settings for the manifest source backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Directory the manifest tree is served from. Relative paths are
    /// resolved against the working directory by the caller.
    pub root: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { root: PathBuf::from("content") }
    }
}

/// Settings for the startup preload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PreloadSettings {
    /// Category tags to preload. `None` preloads everything.
    pub categories: Option<Vec<String>>,
    /// Log each loaded path once the run settles.
    pub log_progress: bool,
    /// Fail the run if any manifest failed, instead of absorbing failures
    /// into the report.
    pub throw_on_error: bool,
}

impl PreloadSettings {
    /// Parses the configured tags into typed categories.
    ///
    /// # Errors
    /// [`ErrorKind::UnknownCategory`] naming the first tag that does not
    /// match any category.
    pub fn selection(&self) -> Result<Option<Vec<Category>>> {
        let Some(tags) = &self.categories else {
            return Ok(None);
        };
        let mut selected = Vec::with_capacity(tags.len());
        for tag in tags {
            let category = tag.parse::<Category>().or_raise(|| ErrorKind::UnknownCategory(tag.clone()))?;
            selected.push(category);
        }
        Ok(Some(selected))
    }
}

impl Settings {
    /// Assembles settings from defaults, the project config directory and
    /// the environment.
    ///
    /// A missing `grimoire.toml` is not an error; the defaults and the
    /// environment still apply.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dirs) = ProjectDirs::from("", "", "grimoire") {
            let file = dirs.config_dir().join(SETTINGS_FILE);
            debug!(file = %file.display(), "looking for settings file");
            figment = figment.merge(Toml::file(file));
        }
        Self::extract(figment.merge(Self::env_layer()))
    }

    /// Assembles settings with an explicit file instead of the project
    /// config directory. The file must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(file = %path.display(), "merging settings file");
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::file_exact(path)).merge(Self::env_layer());
        Self::extract(figment)
    }

    fn env_layer() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Self = figment.extract().or_raise(|| ErrorKind::Figment)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants the serde layer cannot express.
    fn validate(&self) -> Result<()> {
        if self.source.root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid);
        }
        self.preload.selection()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_defaults_apply_without_file_or_env() {
        figment::Jail::expect_with(|jail| {
            // Keep the project config dir inside the jail.
            jail.set_env("XDG_CONFIG_HOME", jail.directory().display().to_string());
            let settings = Settings::load().expect("defaults should assemble");
            assert_eq!(settings.source.root, PathBuf::from("content"));
            assert_eq!(settings.preload.categories, None);
            assert!(!settings.preload.log_progress);
            assert!(!settings.preload.throw_on_error);
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "grimoire.toml",
                r#"
                    [source]
                    root = "/srv/content"

                    [preload]
                    categories = ["enemies", "sounds"]
                    log_progress = true
                "#,
            )?;
            let settings = Settings::from_file("grimoire.toml").expect("file should merge");
            assert_eq!(settings.source.root, PathBuf::from("/srv/content"));
            assert!(settings.preload.log_progress);
            let selection = settings.preload.selection().unwrap();
            assert_eq!(selection, Some(vec![Category::Enemies, Category::Sounds]));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "grimoire.toml",
                r#"
                    [preload]
                    throw_on_error = false
                "#,
            )?;
            jail.set_env("GRIMOIRE_PRELOAD__THROW_ON_ERROR", "true");
            jail.set_env("GRIMOIRE_SOURCE__ROOT", "/opt/manifests");
            let settings = Settings::from_file("grimoire.toml").expect("env should merge");
            assert!(settings.preload.throw_on_error);
            assert_eq!(settings.source.root, PathBuf::from("/opt/manifests"));
            Ok(())
        });
    }

    #[test]
    fn test_unknown_category_is_rejected_at_load_time() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "grimoire.toml",
                r#"
                    [preload]
                    categories = ["enemys"]
                "#,
            )?;
            let err = Settings::from_file("grimoire.toml").expect_err("typo should be rejected");
            assert!(matches!(&*err, ErrorKind::UnknownCategory(tag) if tag == "enemys"));
            assert!(err.to_string().contains("enemys"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        figment::Jail::expect_with(|_jail| {
            let err = Settings::from_file("does-not-exist.toml").expect_err("explicit file must exist");
            assert!(matches!(&*err, ErrorKind::Figment));
            Ok(())
        });
    }

    #[test]
    fn test_empty_root_is_invalid() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "grimoire.toml",
                r#"
                    [source]
                    root = ""
                "#,
            )?;
            let err = Settings::from_file("grimoire.toml").expect_err("empty root should be rejected");
            assert!(matches!(&*err, ErrorKind::Invalid));
            Ok(())
        });
    }

    #[rstest]
    #[case("chapters", Category::Chapters)]
    #[case("enemies", Category::Enemies)]
    #[case("chapter-plates", Category::ChapterPlates)]
    fn test_selection_parses_known_tags(#[case] tag: &str, #[case] expected: Category) {
        let preload = PreloadSettings { categories: Some(vec![tag.to_owned()]), ..PreloadSettings::default() };
        assert_eq!(preload.selection().unwrap(), Some(vec![expected]));
    }
}
