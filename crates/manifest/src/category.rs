use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, ErrorKind},
    path::ManifestPath,
};

/// Manifest category enum.
///
/// Every loadable manifest belongs to exactly one category, and each
/// category has its own schema. All categories except
/// [`Category::Chapters`] live in a single well-known file; chapters
/// spread across one file per chapter id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Chapters,
    Enemies,
    Npcs,
    Sprites,
    Cinematics,
    Sounds,
    Effects,
    Items,
    Scenes,
    ChapterPlates,
}

impl Category {
    /// Every known category, in preload order.
    pub const ALL: [Self; 10] = [
        Self::Chapters,
        Self::Enemies,
        Self::Npcs,
        Self::Sprites,
        Self::Cinematics,
        Self::Sounds,
        Self::Effects,
        Self::Items,
        Self::Scenes,
        Self::ChapterPlates,
    ];

    /// Returns the category tag as it appears in payloads and paths.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Chapters => "chapters",
            Self::Enemies => "enemies",
            Self::Npcs => "npcs",
            Self::Sprites => "sprites",
            Self::Cinematics => "cinematics",
            Self::Sounds => "sounds",
            Self::Effects => "effects",
            Self::Items => "items",
            Self::Scenes => "scenes",
            Self::ChapterPlates => "chapter-plates",
        }
    }

    /// Returns the single manifest path for this category, or `None`
    /// for [`Category::Chapters`], which has one path per chapter id.
    pub fn well_known_path(&self) -> Option<ManifestPath> {
        match self {
            Self::Chapters => None,
            other => Some(ManifestPath::new(format!("{}.json", other.tag()))),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}

impl FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(match sanitized.as_str() {
            "chapters" => Self::Chapters,
            "enemies" => Self::Enemies,
            "npcs" => Self::Npcs,
            "sprites" => Self::Sprites,
            "cinematics" => Self::Cinematics,
            "sounds" => Self::Sounds,
            "effects" => Self::Effects,
            "items" => Self::Items,
            "scenes" => Self::Scenes,
            "chapter-plates" | "chapterplates" => Self::ChapterPlates,
            _ => exn::bail!(ErrorKind::UnknownCategory(s.to_owned())),
        })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.tag())
    }
}
