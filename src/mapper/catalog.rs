//! Item and NPC catalog loaders.
//!
//! Item and NPC names are not part of the room graph schema; they arrive as
//! JSON catalog files produced by the shop/feature trackers, each entry
//! pointing at a room id. Entries referencing rooms the store does not know
//! are skipped with a warning so one stale line cannot poison search.

use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::mapper::errors::MapperError;
use crate::mapper::store::RoomGraphStore;
use crate::mapper::types::{ItemSearchResult, NpcSearchResult};

/// One room's worth of item names, as written by the shop/feature tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCatalogEntry {
    pub room_id: String,
    pub items: Vec<String>,
    /// Where the entry came from, e.g. "shop" or "feature".
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "shop".to_string()
}

/// One NPC sighting.
#[derive(Debug, Clone, Deserialize)]
pub struct NpcCatalogEntry {
    pub name: String,
    pub room_id: String,
}

/// Flattened, room-resolved item listing ready for substring search.
/// Insertion order follows the catalog file, which keeps result ordering
/// stable across identical queries.
pub fn load_item_catalog<P: AsRef<Path>>(
    path: P,
    store: &RoomGraphStore,
) -> Result<Vec<ItemSearchResult>, MapperError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let entries: Vec<ItemCatalogEntry> = serde_json::from_str(&contents)
        .map_err(|e| MapperError::Catalog(format!("failed to parse {}: {e}", path.display())))?;

    let mut out = Vec::new();
    for entry in entries {
        let Some(room) = store.get_room(&entry.room_id)? else {
            warn!(
                "item catalog references unknown room {}, skipping {} item(s)",
                entry.room_id,
                entry.items.len()
            );
            continue;
        };
        for item_name in entry.items {
            out.push(ItemSearchResult {
                item_name,
                source: entry.source.clone(),
                room_id: room.room_id.clone(),
                map_id: room.map_id,
                xpos: room.xpos,
                ypos: room.ypos,
                room_short: room.room_short.clone(),
            });
        }
    }
    Ok(out)
}

/// Room-resolved NPC listing, insertion-ordered like the item catalog.
pub fn load_npc_catalog<P: AsRef<Path>>(
    path: P,
    store: &RoomGraphStore,
) -> Result<Vec<NpcSearchResult>, MapperError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let entries: Vec<NpcCatalogEntry> = serde_json::from_str(&contents)
        .map_err(|e| MapperError::Catalog(format!("failed to parse {}: {e}", path.display())))?;

    let mut out = Vec::new();
    for entry in entries {
        let Some(room) = store.get_room(&entry.room_id)? else {
            warn!(
                "npc catalog references unknown room {} for {}, skipping",
                entry.room_id, entry.name
            );
            continue;
        };
        out.push(NpcSearchResult {
            npc_name: entry.name,
            room_id: room.room_id.clone(),
            map_id: room.map_id,
            xpos: room.xpos,
            ypos: room.ypos,
            room_short: room.room_short,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::types::Room;
    use std::io::Write;

    fn store_with_room() -> RoomGraphStore {
        let store = RoomGraphStore::open_in_memory().unwrap();
        store
            .put_room(&Room::new("tavern", 1, 0, 0, "Broken Drum", "inside"))
            .unwrap();
        store
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn item_catalog_resolves_rooms_and_skips_unknown() {
        let store = store_with_room();
        let file = write_temp(
            r#"[
                {"room_id": "tavern", "items": ["beer", "sausage"], "source": "shop"},
                {"room_id": "ghost", "items": ["nothing"]}
            ]"#,
        );
        let items = load_item_catalog(file.path(), &store).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_name, "beer");
        assert_eq!(items[0].room_short, "Broken Drum");
        assert_eq!(items[1].item_name, "sausage");
    }

    #[test]
    fn npc_catalog_round_trip() {
        let store = store_with_room();
        let file = write_temp(r#"[{"name": "Barman", "room_id": "tavern"}]"#);
        let npcs = load_npc_catalog(file.path(), &store).unwrap();
        assert_eq!(npcs.len(), 1);
        assert_eq!(npcs[0].npc_name, "Barman");
        assert_eq!(npcs[0].map_id, 1);
    }

    #[test]
    fn malformed_catalog_is_a_catalog_error() {
        let store = store_with_room();
        let file = write_temp("not json at all");
        let err = load_item_catalog(file.path(), &store).unwrap_err();
        assert!(matches!(err, MapperError::Catalog(_)));
    }
}
