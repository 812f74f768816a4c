//! Binary entrypoint for the mudmap CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `status` - open the graph store and print a brief summary
//! - `route <from> <to>` - find and narrate a route between two rooms
//! - `map <room>` - render the textual mini-map around a room
//! - `map-image <room>` - render the raster map to a PNG file
//! - `loc <fragment>` - locate rooms by name and print their coordinates
//! - `find <kind> <fragment>` - search rooms, items or NPCs by name
//! - `item <name>` - list rooms that stock an item
//!
//! These commands stand in for the relay command handlers: everything they
//! pass to the engine (room ids, character names, toggles, fragments) comes
//! in the same shape the chat surface supplies.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use mudmap::config::Config;
use mudmap::mapper::{
    load_item_catalog, load_npc_catalog, render_grid, RasterRenderer, RoomGraphStore, RouteFinder,
    SearchIndex,
};
use mudmap::validation::{validate_fragment, validate_room_id};

/// Routes longer than this are flagged as "too long" before auto-walking.
/// A display policy of this surface, not an engine limit.
const ROUTE_DISPLAY_LIMIT: usize = 150;

#[derive(Parser)]
#[command(name = "mudmap")]
#[command(about = "Room graph, routing and map rendering for a MUD relay client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a starter configuration file
    Init,
    /// Show graph store status
    Status,
    /// Find a route between two rooms
    Route {
        /// Starting room id (from live game state)
        from: String,
        /// Target room id
        to: String,
        /// Character whose teleports may be spliced in
        #[arg(short = 'n', long)]
        character: Option<String>,
        /// Allow teleport shortcuts
        #[arg(short, long)]
        teleports: bool,
    },
    /// Render the textual mini-map around a room
    Map {
        /// Center room id
        room: String,
    },
    /// Render the raster map to a PNG file
    MapImage {
        /// Current room id
        room: String,
        /// Output file
        #[arg(short, long, default_value = "map.png")]
        out: String,
        /// Overlay the route to this room id
        #[arg(long)]
        route_to: Option<String>,
    },
    /// Locate rooms by name and print their coordinates
    Loc {
        /// Room name fragment
        fragment: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Search rooms, items or NPCs by name fragment
    Find {
        /// What to search: room, item or npc
        kind: String,
        /// Name fragment
        fragment: String,
        /// Maximum results to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List rooms that stock an item
    Item {
        /// Item name or fragment
        name: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

/// Open the store and build the search index with whatever catalogs the
/// config points at. Missing catalog files only cost a warning; the room
/// search still works without them.
fn build_index<'a>(config: &Config, store: &'a RoomGraphStore) -> SearchIndex<'a> {
    let mut index = SearchIndex::new(store);
    if let Some(path) = &config.storage.item_catalog {
        match load_item_catalog(path, store) {
            Ok(items) => index = index.with_items(items),
            Err(e) => warn!("item catalog {path} not loaded: {e}"),
        }
    }
    if let Some(path) = &config.storage.npc_catalog {
        match load_npc_catalog(path, store) {
            Ok(npcs) => index = index.with_npcs(npcs),
            Err(e) => warn!("npc catalog {path} not loaded: {e}"),
        }
    }
    index
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Wrote starter configuration to {}", cli.config);
        return Ok(());
    }

    let config = Config::load(&cli.config).await?;
    let store = RoomGraphStore::open(&config.storage.graph_db)?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Status => {
            println!("graph db: {}", config.storage.graph_db);
            println!("rooms: {}", store.room_count()?);
            println!("characters with teleports: {}", config.characters.len());
        }
        Commands::Route {
            from,
            to,
            character,
            teleports,
        } => {
            validate_room_id(&from).map_err(|e| anyhow!("{e}"))?;
            validate_room_id(&to).map_err(|e| anyhow!("{e}"))?;
            let registry = config.teleport_registry();
            let finder = RouteFinder::new(&store, &registry);
            let route = finder.find_route(&from, &to, teleports, character.as_deref())?;
            if route.is_empty() {
                println!("Already there.");
                return Ok(());
            }
            println!("{} ({} steps)", route.narrate(), route.len());
            if route.len() > ROUTE_DISPLAY_LIMIT {
                println!("Warning: route is too long to auto-walk ({} steps).", route.len());
            }
            let set = registry.for_character(character.as_deref());
            if route.uses_teleport() && !set.reliable {
                println!("Warning: route uses a teleport this character cannot rely on.");
            }
        }
        Commands::Map { room } => {
            validate_room_id(&room).map_err(|e| anyhow!("{e}"))?;
            let grid = render_grid(&store, &room, &config.grid_options())?;
            print!("{grid}");
        }
        Commands::MapImage { room, out, route_to } => {
            validate_room_id(&room).map_err(|e| anyhow!("{e}"))?;
            let route = match route_to {
                Some(target) => {
                    let registry = config.teleport_registry();
                    let finder = RouteFinder::new(&store, &registry);
                    Some(finder.find_route(&room, &target, false, None)?)
                }
                None => None,
            };
            let renderer = RasterRenderer::new();
            let map = renderer.render(&store, &room, route.as_ref(), &config.raster_options())?;
            std::fs::write(&out, &map.png)?;
            info!(
                "wrote {} ({}x{} {} at {} px/room)",
                out, map.width, map.height, map.mime_type, map.scale
            );
        }
        Commands::Loc { fragment, limit } => {
            validate_fragment(&fragment).map_err(|e| anyhow!("{e}"))?;
            let index = SearchIndex::new(&store);
            let hits = index.search_rooms(&fragment, limit + 1)?;
            if hits.is_empty() {
                println!("No room matches \"{fragment}\".");
            }
            for (i, hit) in hits.iter().take(limit).enumerate() {
                println!(
                    "{}) {} at ({},{}) on map {} [{}]",
                    i + 1,
                    hit.room_short,
                    hit.xpos,
                    hit.ypos,
                    hit.map_id,
                    hit.room_id
                );
            }
            if hits.len() > limit {
                println!("...more results; narrow the search.");
            }
        }
        Commands::Find { kind, fragment, limit } => {
            validate_fragment(&fragment).map_err(|e| anyhow!("{e}"))?;
            let index = build_index(&config, &store);
            // over-fetch by one to detect truncation without a second query
            match kind.as_str() {
                "room" => {
                    let hits = index.search_rooms(&fragment, limit + 1)?;
                    for (i, hit) in hits.iter().take(limit).enumerate() {
                        println!(
                            "{}) {} [{} ({},{}) map {}]",
                            i + 1,
                            hit.room_short,
                            hit.room_id,
                            hit.xpos,
                            hit.ypos,
                            hit.map_id
                        );
                    }
                    if hits.len() > limit {
                        println!("...more results; narrow the search.");
                    }
                }
                "item" => {
                    let hits = index.search_items(&fragment, limit + 1)?;
                    for (i, hit) in hits.iter().take(limit).enumerate() {
                        println!(
                            "{}) {} ({}) at {} [{}]",
                            i + 1,
                            hit.item_name,
                            hit.source,
                            hit.room_short,
                            hit.room_id
                        );
                    }
                    if hits.len() > limit {
                        println!("...more results; narrow the search.");
                    }
                }
                "npc" => {
                    let hits = index.search_npcs(&fragment, limit + 1)?;
                    for (i, hit) in hits.iter().take(limit).enumerate() {
                        println!(
                            "{}) {} at {} [{}]",
                            i + 1,
                            hit.npc_name,
                            hit.room_short,
                            hit.room_id
                        );
                    }
                    if hits.len() > limit {
                        println!("...more results; narrow the search.");
                    }
                }
                other => return Err(anyhow!("unknown search kind: {other} (room|item|npc)")),
            }
        }
        Commands::Item { name, limit } => {
            let index = build_index(&config, &store);
            let rooms = index.rooms_for_item(&name, limit)?;
            if rooms.is_empty() {
                println!("No known room stocks \"{name}\".");
            }
            for (i, room) in rooms.iter().enumerate() {
                println!(
                    "{}) {} [{} ({},{}) map {}]",
                    i + 1,
                    room.room_short,
                    room.room_id,
                    room.xpos,
                    room.ypos,
                    room.map_id
                );
            }
        }
    }

    Ok(())
}
