//! The static chapter id table.
//!
//! Chapter manifests are the one category split across multiple files,
//! one per chapter id. The id to path mapping is a fixed table baked in
//! at compile time; slugs are part of the table, never derived from
//! payload content at runtime.

use crate::path::ManifestPath;

/// Slug for each chapter id, indexed by id.
const CHAPTER_SLUGS: [&str; 10] = [
    "the-calling",
    "ashfall",
    "the-hollow-road",
    "lanterns-in-the-deep",
    "the-sunken-archive",
    "salt-and-iron",
    "the-breach",
    "winters-toll",
    "the-last-bastion",
    "embershade",
];

/// Number of chapters the game ships with. Derived from the slug table
/// so the two can never disagree.
pub const TOTAL_CHAPTERS: u32 = CHAPTER_SLUGS.len() as u32;

/// Returns `true` when `id` names a chapter that exists.
pub const fn is_valid_chapter_id(id: u32) -> bool {
    id < TOTAL_CHAPTERS
}

/// Returns the manifest path for a chapter id, or `None` when the id is
/// out of range. Never touches I/O.
pub fn chapter_path(id: u32) -> Option<ManifestPath> {
    let slug = CHAPTER_SLUGS.get(id as usize)?;
    Some(ManifestPath::new(format!(
        "chapters/chapter-{id}-{slug}.json"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_valid_id_has_a_path() {
        for id in 0..TOTAL_CHAPTERS {
            assert!(is_valid_chapter_id(id));
            assert!(chapter_path(id).is_some());
        }
    }

    #[test]
    fn out_of_range_ids_have_no_path() {
        for id in [TOTAL_CHAPTERS, TOTAL_CHAPTERS + 1, u32::MAX] {
            assert!(!is_valid_chapter_id(id));
            assert!(chapter_path(id).is_none());
        }
    }

    #[test]
    fn paths_embed_id_and_slug() {
        assert_eq!(
            chapter_path(0).unwrap().as_str(),
            "chapters/chapter-0-the-calling.json"
        );
        assert_eq!(
            chapter_path(9).unwrap().as_str(),
            "chapters/chapter-9-embershade.json"
        );
    }

    #[test]
    fn paths_are_unique_per_id() {
        let mut seen = std::collections::HashSet::new();
        for id in 0..TOTAL_CHAPTERS {
            assert!(seen.insert(chapter_path(id).unwrap()));
        }
        assert_eq!(seen.len() as u32, TOTAL_CHAPTERS);
    }
}
