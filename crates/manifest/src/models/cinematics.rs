use serde::{Deserialize, Serialize};

/// One cinematic (frame sequence) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CinematicDef {
    pub id: String,
    /// Directory of numbered frames relative to the asset root.
    pub path: String,
    /// Playback rate in frames per second.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Keep the final frame on screen instead of cutting to black.
    #[serde(default)]
    pub hold_last: bool,
}

fn default_fps() -> f64 {
    12.0
}

/// The full cinematic catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CinematicsManifest {
    /// Category tag, always `cinematics`.
    pub category: String,
    pub cinematics: Vec<CinematicDef>,
}
