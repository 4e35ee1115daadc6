use serde::{Deserialize, Serialize};

/// One sprite sheet definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    pub id: String,
    /// Image path relative to the asset root.
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Number of animation frames in the sheet.
    #[serde(default = "default_frames")]
    pub frames: u32,
}

impl SpriteDef {
    pub fn is_animated(&self) -> bool {
        self.frames > 1
    }
}

fn default_frames() -> u32 {
    1
}

/// The full sprite catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpritesManifest {
    /// Category tag, always `sprites`.
    pub category: String,
    pub sprites: Vec<SpriteDef>,
}
