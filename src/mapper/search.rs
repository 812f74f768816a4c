//! Substring search over rooms, items and NPCs.
//!
//! Matching is deliberately plain: case-insensitive containment against
//! display names, no ranking or scoring, stable ordering (rooms by room id,
//! catalog entries by insertion order). Callers that need a truncation
//! indicator request `limit + 1` results and check whether they got them.

use log::debug;

use crate::logutil::escape_log;
use crate::mapper::errors::MapperError;
use crate::mapper::store::RoomGraphStore;
use crate::mapper::types::{
    ItemSearchResult, NpcSearchResult, Room, RoomSearchResult,
};
use crate::validation::validate_fragment;

/// Search facade over the room store and the item/NPC catalogs.
pub struct SearchIndex<'a> {
    store: &'a RoomGraphStore,
    items: Vec<ItemSearchResult>,
    npcs: Vec<NpcSearchResult>,
}

impl<'a> SearchIndex<'a> {
    pub fn new(store: &'a RoomGraphStore) -> Self {
        Self {
            store,
            items: Vec::new(),
            npcs: Vec::new(),
        }
    }

    /// Attach a pre-loaded item catalog (see [`crate::mapper::catalog`]).
    pub fn with_items(mut self, items: Vec<ItemSearchResult>) -> Self {
        self.items = items;
        self
    }

    /// Attach a pre-loaded NPC catalog.
    pub fn with_npcs(mut self, npcs: Vec<NpcSearchResult>) -> Self {
        self.npcs = npcs;
        self
    }

    /// Rooms whose display name contains `fragment`, ordered by room id.
    pub fn search_rooms(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<RoomSearchResult>, MapperError> {
        let fragment = validate_fragment(fragment)?;
        debug!("room search for \"{}\"", escape_log(fragment));
        let rooms = self.store.search_rooms_by_name(fragment, limit)?;
        Ok(rooms.into_iter().map(RoomSearchResult::from).collect())
    }

    /// Items whose name contains `fragment`, in catalog order.
    pub fn search_items(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<ItemSearchResult>, MapperError> {
        let fragment = validate_fragment(fragment)?.to_lowercase();
        debug!("item search for \"{}\"", escape_log(&fragment));
        Ok(self
            .items
            .iter()
            .filter(|item| item.item_name.to_lowercase().contains(&fragment))
            .take(limit)
            .cloned()
            .collect())
    }

    /// NPCs whose name contains `fragment`, in catalog order.
    pub fn search_npcs(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<NpcSearchResult>, MapperError> {
        let fragment = validate_fragment(fragment)?.to_lowercase();
        debug!("npc search for \"{}\"", escape_log(&fragment));
        Ok(self
            .npcs
            .iter()
            .filter(|npc| npc.npc_name.to_lowercase().contains(&fragment))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Rooms that stock an item matching `item_name`, deduplicated in
    /// catalog order. Supports "where can I buy X, route me to result 2".
    pub fn rooms_for_item(
        &self,
        item_name: &str,
        limit: usize,
    ) -> Result<Vec<RoomSearchResult>, MapperError> {
        let fragment = validate_fragment(item_name)?.to_lowercase();
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for item in &self.items {
            if out.len() >= limit {
                break;
            }
            if !item.item_name.to_lowercase().contains(&fragment) {
                continue;
            }
            if !seen.insert(item.room_id.clone()) {
                continue;
            }
            let Some(room) = self.store.get_room(&item.room_id)? else {
                continue;
            };
            out.push(RoomSearchResult::from(room));
        }
        Ok(out)
    }

    /// Convenience for command handlers that re-target a route at a search
    /// hit: resolve a result's room id back to the full room record.
    pub fn resolve_room(&self, result: &RoomSearchResult) -> Result<Room, MapperError> {
        self.store
            .get_room(&result.room_id)?
            .ok_or_else(|| MapperError::RoomNotFound(result.room_id.clone()))
    }
}
