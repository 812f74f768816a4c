//! Room graph and routing engine.
//!
//! The heart of the relay client: a persisted spatial graph of rooms and
//! exits, per-character teleport shortcuts, deterministic shortest-path
//! routing, substring search over rooms/items/NPCs, and textual plus raster
//! rendering of a room's neighborhood. Everything here is explicitly
//! constructed and dependency-injected; there are no process-wide singletons,
//! so tests can stand up as many isolated graphs as they like.

pub mod catalog;
pub mod errors;
pub mod grid;
pub mod raster;
pub mod route;
pub mod search;
pub mod store;
pub mod teleport;
pub mod types;

pub use catalog::{load_item_catalog, load_npc_catalog};
pub use errors::MapperError;
pub use grid::{render_grid, GridMap, GridOptions};
pub use raster::{RasterMap, RasterOptions, RasterRenderer};
pub use route::{RouteFinder, TELEPORT_COST};
pub use search::SearchIndex;
pub use store::{RoomGraphStore, RoomGraphStoreBuilder};
pub use teleport::TeleportRegistry;
pub use types::{
    CharacterTeleports, Exit, ItemSearchResult, NpcSearchResult, Room, RoomSearchResult,
    RouteResult, RouteStep, TeleportLocation, FLAG_NO_TELEPORT_TARGET,
};
