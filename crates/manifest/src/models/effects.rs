use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Compositing mode enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    #[default]
    Normal,
    Additive,
    Multiply,
}

impl Blend {
    /// Keywords the schema accepts for this field.
    pub const ALLOWED: [&'static str; 3] = ["normal", "additive", "multiply"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Blend::Normal => "normal",
            Blend::Additive => "additive",
            Blend::Multiply => "multiply",
        }
    }
}

impl Display for Blend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One particle or screen effect definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDef {
    pub id: String,
    /// Sprite id, resolved through the sprites manifest.
    pub sprite: String,
    pub duration_ms: u32,
    #[serde(default)]
    pub blend: Blend,
}

/// The full effect catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsManifest {
    /// Category tag, always `effects`.
    pub category: String,
    pub effects: Vec<EffectDef>,
}
