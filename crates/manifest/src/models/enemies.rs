use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Steering profile enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Walks a fixed route, ignores the player.
    Patrol,
    /// Pursues the player on sight.
    Chase,
    /// Stationary, attacks at range.
    Turret,
    /// Moves as a flock with its siblings.
    Swarm,
}

impl Behavior {
    /// Keywords the schema accepts for this field.
    pub const ALLOWED: [&'static str; 4] = ["patrol", "chase", "turret", "swarm"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Patrol => "patrol",
            Behavior::Chase => "chase",
            Behavior::Turret => "turret",
            Behavior::Swarm => "swarm",
        }
    }
}

impl Display for Behavior {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One hostile actor definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    /// Sprite id, resolved through the sprites manifest.
    pub sprite: String,
    pub health: u32,
    /// World units per second.
    pub speed: f64,
    pub behavior: Behavior,
}

/// The full enemy catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemiesManifest {
    /// Category tag, always `enemies`.
    pub category: String,
    pub enemies: Vec<EnemyDef>,
}
