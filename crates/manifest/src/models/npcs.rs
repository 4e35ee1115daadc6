use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A species entry in the NPC manifest's dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDef {
    /// Sprite id shared by every member of the species.
    pub sprite: String,
    /// Free-form trait tags (`nocturnal`, `merchant`, ...).
    #[serde(default)]
    pub traits: Vec<String>,
}

/// One named non-player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: String,
    pub name: String,
    /// Key into the manifest's species dictionary.
    pub species: String,
    /// Dialogue lines in display order.
    #[serde(default)]
    pub dialogue: Vec<String>,
}

/// The full NPC catalog: a species dictionary plus the characters that
/// reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcsManifest {
    /// Category tag, always `npcs`.
    pub category: String,
    pub species: BTreeMap<String, SpeciesDef>,
    pub npcs: Vec<NpcDef>,
}

impl NpcsManifest {
    /// Resolves an NPC's species entry. Always succeeds on a validated
    /// manifest; the schema rejects dangling species references.
    pub fn species_of(&self, npc: &NpcDef) -> Option<&SpeciesDef> {
        self.species.get(&npc.species)
    }
}
