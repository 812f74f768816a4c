//! Shortest-path search over the room graph.
//!
//! Uniform-cost (Dijkstra) search with integer edge costs: every walked exit
//! costs 1, and a character's registered teleports are spliced in as virtual
//! single-step edges from the start room. The search is fully deterministic:
//! neighbors are expanded in a declared order (exits lexicographically by
//! command then destination, teleports by destination name) and ties between
//! equal-cost frontier entries pop in insertion order, so identical inputs
//! always reconstruct the identical route.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::debug;

use crate::mapper::errors::MapperError;
use crate::mapper::store::RoomGraphStore;
use crate::mapper::teleport::TeleportRegistry;
use crate::mapper::types::{Room, RouteResult, RouteStep, FLAG_NO_TELEPORT_TARGET};

/// Cost of a synthesized teleport edge. Strictly greater than any plausible
/// walking distance between adjacent teleport hubs, so a teleport only wins
/// when the walk genuinely is longer, while still narrating as one step.
pub const TELEPORT_COST: u64 = 250;

/// Stateless pathfinder over a store and a teleport registry.
pub struct RouteFinder<'a> {
    store: &'a RoomGraphStore,
    teleports: &'a TeleportRegistry,
}

/// How a room was reached, for path reconstruction.
struct Arrival {
    from_room_id: String,
    exit_command: String,
    teleport: bool,
}

impl<'a> RouteFinder<'a> {
    pub fn new(store: &'a RoomGraphStore, teleports: &'a TeleportRegistry) -> Self {
        Self { store, teleports }
    }

    /// Find the cheapest route from `start_room_id` to `target_room_id`.
    ///
    /// With `use_teleports` set, the character's registered teleports become
    /// candidate first steps (teleports are usable once, from the player's
    /// current position, never mid-route). Unreliable teleports are not
    /// suppressed here; the returned steps carry a `teleport` marker so the
    /// caller can warn before committing.
    pub fn find_route(
        &self,
        start_room_id: &str,
        target_room_id: &str,
        use_teleports: bool,
        character_name: Option<&str>,
    ) -> Result<RouteResult, MapperError> {
        let start = self
            .store
            .get_room(start_room_id)?
            .ok_or_else(|| MapperError::RoomNotFound(start_room_id.to_string()))?;
        self.store
            .get_room(target_room_id)?
            .ok_or_else(|| MapperError::RoomNotFound(target_room_id.to_string()))?;

        if start_room_id == target_room_id {
            return Ok(RouteResult::default());
        }

        let teleport_edges = if use_teleports {
            self.teleport_edges(&start, character_name)?
        } else {
            Vec::new()
        };

        // dist and arrival are keyed by room id; ordering never depends on
        // their iteration order, only on the heap and sorted neighbor lists.
        let mut dist: HashMap<String, u64> = HashMap::new();
        let mut arrival: HashMap<String, Arrival> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<(u64, u64, String)>> = BinaryHeap::new();
        let mut seq: u64 = 0;

        dist.insert(start.room_id.clone(), 0);
        heap.push(Reverse((0, seq, start.room_id.clone())));

        while let Some(Reverse((cost, _, room_id))) = heap.pop() {
            if room_id == target_room_id {
                break;
            }
            if dist.get(&room_id).copied().unwrap_or(u64::MAX) < cost {
                continue; // stale frontier entry
            }

            let mut relax =
                |to: &str, command: &str, step_cost: u64, is_teleport: bool, heap: &mut BinaryHeap<Reverse<(u64, u64, String)>>| {
                    if to == room_id {
                        return; // self-loop, can never improve
                    }
                    let next = cost + step_cost;
                    if next < dist.get(to).copied().unwrap_or(u64::MAX) {
                        dist.insert(to.to_string(), next);
                        arrival.insert(
                            to.to_string(),
                            Arrival {
                                from_room_id: room_id.clone(),
                                exit_command: command.to_string(),
                                teleport: is_teleport,
                            },
                        );
                        seq += 1;
                        heap.push(Reverse((next, seq, to.to_string())));
                    }
                };

            for exit in self.store.exits_from(&room_id)? {
                relax(&exit.to_room_id, &exit.exit_command, 1, false, &mut heap);
            }
            if room_id == start.room_id {
                for (command, landing) in &teleport_edges {
                    relax(landing, command, TELEPORT_COST, true, &mut heap);
                }
            }
        }

        if !arrival.contains_key(target_room_id) {
            return Err(MapperError::NoRouteFound {
                from: start_room_id.to_string(),
                to: target_room_id.to_string(),
            });
        }

        let mut steps = Vec::new();
        let mut cursor = target_room_id.to_string();
        while cursor != start.room_id {
            let hop = &arrival[&cursor];
            steps.push(RouteStep {
                exit_command: hop.exit_command.clone(),
                resulting_room_id: cursor.clone(),
                teleport: hop.teleport,
            });
            cursor = hop.from_room_id.clone();
        }
        steps.reverse();
        debug!(
            "route {} -> {}: {} step(s), teleport={}",
            start_room_id,
            target_room_id,
            steps.len(),
            steps.iter().any(|s| s.teleport)
        );
        Ok(RouteResult { steps })
    }

    /// Resolve the character's teleports into concrete (command, landing
    /// room id) edges, sorted by destination name. A teleport lands on the
    /// room at its exact coordinates when known, otherwise the nearest room
    /// on that map; destinations flagged as no-teleport-target are skipped.
    fn teleport_edges(
        &self,
        start: &Room,
        character_name: Option<&str>,
    ) -> Result<Vec<(String, String)>, MapperError> {
        let set = self.teleports.for_character(character_name);
        let mut locations = set.locations;
        locations.sort_by(|a, b| a.name.cmp(&b.name));

        let mut edges = Vec::new();
        for location in locations {
            let landing = match self
                .store
                .find_by_coordinates(location.map_id, location.x, location.y)?
            {
                Some(room) => Some(room),
                None => self.store.nearest_room(location.map_id, location.x, location.y)?,
            };
            let Some(landing) = landing else {
                debug!("teleport {} has no known landing room", location.name);
                continue;
            };
            if landing.has_flag(FLAG_NO_TELEPORT_TARGET) || landing.room_id == start.room_id {
                continue;
            }
            edges.push((format!("teleport {}", location.name), landing.room_id));
        }
        Ok(edges)
    }
}
