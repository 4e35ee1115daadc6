use serde::{Deserialize, Serialize};

/// One chapter title plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateDef {
    /// Chapter the plate introduces.
    pub chapter: u32,
    /// Image path relative to the asset root.
    pub path: String,
}

/// The full chapter plate catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterPlatesManifest {
    /// Category tag, always `chapter-plates`.
    pub category: String,
    pub plates: Vec<PlateDef>,
}

impl ChapterPlatesManifest {
    /// Returns the plate for a chapter id, if one was authored.
    pub fn plate_for(&self, chapter: u32) -> Option<&PlateDef> {
        self.plates.iter().find(|plate| plate.chapter == chapter)
    }
}
