use serde::{Deserialize, Serialize};

/// One sound or music track definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDef {
    pub id: String,
    /// Audio file path relative to the asset root.
    pub path: String,
    /// Playback gain in `[0.0, 1.0]`.
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub looped: bool,
}

fn default_volume() -> f64 {
    1.0
}

/// The full sound catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundsManifest {
    /// Category tag, always `sounds`.
    pub category: String,
    pub sounds: Vec<SoundDef>,
}
