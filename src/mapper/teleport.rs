//! Per-character registry of named fast-travel destinations.
//!
//! Built once from configuration and immutable for the life of the process.
//! The route finder consults it only when the caller's teleport toggle is on.

use std::collections::HashMap;

use crate::mapper::types::{CharacterTeleports, TeleportLocation};

/// Immutable table of character name -> teleport set.
#[derive(Debug, Default)]
pub struct TeleportRegistry {
    // keys lowercased once at construction
    characters: HashMap<String, CharacterTeleports>,
}

impl TeleportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character's teleport set. Last write wins when the same
    /// name (case-insensitively) appears twice.
    pub fn with_character(
        mut self,
        name: &str,
        reliable: bool,
        locations: Vec<TeleportLocation>,
    ) -> Self {
        self.characters.insert(
            name.to_lowercase(),
            CharacterTeleports {
                reliable,
                locations,
            },
        );
        self
    }

    /// Look up a character's teleports by exact (case-insensitive) name.
    ///
    /// Unknown or blank names fall back to "no shortcuts, assume reliable":
    /// the empty set never offers an edge that could be wrongly trusted.
    pub fn for_character(&self, name: Option<&str>) -> CharacterTeleports {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => self
                .characters
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_default(),
            _ => CharacterTeleports::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub(name: &str, map_id: i64, x: i64, y: i64) -> TeleportLocation {
        TeleportLocation {
            name: name.to_string(),
            map_id,
            x,
            y,
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry =
            TeleportRegistry::new().with_character("Granny", false, vec![hub("cottage", 3, 4, 5)]);
        let teleports = registry.for_character(Some("gRaNNy"));
        assert!(!teleports.reliable);
        assert_eq!(teleports.locations.len(), 1);
        assert_eq!(teleports.locations[0].name, "cottage");
    }

    #[test]
    fn unknown_and_blank_names_get_the_safe_default() {
        let registry = TeleportRegistry::new();
        for name in [None, Some(""), Some("   "), Some("stranger")] {
            let teleports = registry.for_character(name);
            assert!(teleports.reliable);
            assert!(teleports.locations.is_empty());
        }
    }
}
