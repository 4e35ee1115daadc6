mod chapter;
mod cinematics;
mod effects;
mod enemies;
mod items;
mod npcs;
mod plates;
mod scenes;
mod sounds;
mod sprites;

pub use self::chapter::ChapterManifest;
pub use self::cinematics::{CinematicDef, CinematicsManifest};
pub use self::effects::{Blend, EffectDef, EffectsManifest};
pub use self::enemies::{Behavior, EnemiesManifest, EnemyDef};
pub use self::items::{ItemDef, ItemsManifest};
pub use self::npcs::{NpcDef, NpcsManifest, SpeciesDef};
pub use self::plates::{ChapterPlatesManifest, PlateDef};
pub use self::scenes::{SceneDef, ScenesManifest};
pub use self::sounds::{SoundDef, SoundsManifest};
pub use self::sprites::{SpriteDef, SpritesManifest};

use crate::category::Category;

/// A validated manifest, one variant per category.
///
/// Construction goes through [`crate::validate`], so holding a value of
/// this type means the payload satisfied its category's schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    Chapter(ChapterManifest),
    Enemies(EnemiesManifest),
    Npcs(NpcsManifest),
    Sprites(SpritesManifest),
    Cinematics(CinematicsManifest),
    Sounds(SoundsManifest),
    Effects(EffectsManifest),
    Items(ItemsManifest),
    Scenes(ScenesManifest),
    ChapterPlates(ChapterPlatesManifest),
}

impl Manifest {
    /// Returns the category this manifest belongs to.
    pub fn category(&self) -> Category {
        match self {
            Manifest::Chapter(_) => Category::Chapters,
            Manifest::Enemies(_) => Category::Enemies,
            Manifest::Npcs(_) => Category::Npcs,
            Manifest::Sprites(_) => Category::Sprites,
            Manifest::Cinematics(_) => Category::Cinematics,
            Manifest::Sounds(_) => Category::Sounds,
            Manifest::Effects(_) => Category::Effects,
            Manifest::Items(_) => Category::Items,
            Manifest::Scenes(_) => Category::Scenes,
            Manifest::ChapterPlates(_) => Category::ChapterPlates,
        }
    }

    pub fn as_chapter(&self) -> Option<&ChapterManifest> {
        match self {
            Manifest::Chapter(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_enemies(&self) -> Option<&EnemiesManifest> {
        match self {
            Manifest::Enemies(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_npcs(&self) -> Option<&NpcsManifest> {
        match self {
            Manifest::Npcs(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_sprites(&self) -> Option<&SpritesManifest> {
        match self {
            Manifest::Sprites(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_cinematics(&self) -> Option<&CinematicsManifest> {
        match self {
            Manifest::Cinematics(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_sounds(&self) -> Option<&SoundsManifest> {
        match self {
            Manifest::Sounds(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_effects(&self) -> Option<&EffectsManifest> {
        match self {
            Manifest::Effects(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&ItemsManifest> {
        match self {
            Manifest::Items(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_scenes(&self) -> Option<&ScenesManifest> {
        match self {
            Manifest::Scenes(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_chapter_plates(&self) -> Option<&ChapterPlatesManifest> {
        match self {
            Manifest::ChapterPlates(inner) => Some(inner),
            _ => None,
        }
    }
}
