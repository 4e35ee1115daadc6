use serde::{Deserialize, Serialize};

/// A single chapter definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterManifest {
    /// Chapter id, must match the id encoded in the manifest path.
    pub id: u32,
    /// Player-facing chapter title.
    pub name: String,
    /// Optional flavour text shown on the chapter plate.
    pub summary: Option<String>,
    /// Scene id the chapter starts in.
    pub scene: String,
    /// Optional soundtrack id played over the chapter.
    pub soundtrack: Option<String>,
    /// Content unlocked on completing the chapter.
    #[serde(default)]
    pub unlocks: Vec<String>,
}

impl ChapterManifest {
    /// Returns true when completing this chapter unlocks anything.
    pub fn has_unlocks(&self) -> bool {
        !self.unlocks.is_empty()
    }
}
