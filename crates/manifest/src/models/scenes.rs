use serde::{Deserialize, Serialize};

/// One scene (playable area) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub id: String,
    /// Chapter plate shown when entering, if any.
    pub plate: Option<String>,
    /// Sound id looped while the scene is active.
    pub music: Option<String>,
    /// Owning chapter, when the scene belongs to exactly one.
    pub chapter: Option<u32>,
}

/// The full scene catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenesManifest {
    /// Category tag, always `scenes`.
    pub category: String,
    pub scenes: Vec<SceneDef>,
}
