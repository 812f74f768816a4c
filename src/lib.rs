//! # Mudmap - Room Graph & Routing Engine for a MUD Relay Client
//!
//! Mudmap is the mapping and automation core of a relay client for a
//! text-based multiplayer world. It owns a persisted spatial graph of rooms
//! and exits, answers "how do I get from A to B" deterministically, searches
//! rooms/items/NPCs by name fragment, and renders the local neighborhood as
//! text or as a raster image.
//!
//! ## Features
//!
//! - **Room graph store**: read-mostly sqlite graph of rooms and directed
//!   exits, rebuilt offline by separate maintenance tooling.
//! - **Deterministic routing**: uniform-cost shortest path with a declared
//!   tie-break order, so identical queries always narrate identically.
//! - **Teleport splicing**: per-character fast-travel shortcuts become
//!   single-step virtual edges from the current room, with a reliability
//!   flag surfaced so callers can prompt before auto-sending.
//! - **Substring search**: case-insensitive containment over room, item and
//!   NPC names with stable ordering and caller-side truncation detection.
//! - **Map rendering**: bounded ASCII grids and PNG rasters with the pixel
//!   geometry exposed for click-to-select and route overlays.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mudmap::config::Config;
//! use mudmap::mapper::{RoomGraphStore, RouteFinder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = RoomGraphStore::open(&config.storage.graph_db)?;
//!     let registry = config.teleport_registry();
//!     let finder = RouteFinder::new(&store, &registry);
//!     let route = finder.find_route("start_id", "target_id", true, Some("Granny"))?;
//!     println!("{} ({} steps)", route.narrate(), route.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`mapper`] - The engine: store, teleports, routing, search, rendering
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Input validation for user-supplied query material
//! - [`logutil`] - Log sanitization helpers

pub mod config;
pub mod logutil;
pub mod mapper;
pub mod validation;
