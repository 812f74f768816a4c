//! Configuration management.
//!
//! TOML configuration covering the storage paths, map rendering defaults,
//! and each character's teleport set. Loaded once at startup; the engine
//! treats everything here as immutable for the life of the process.
//!
//! ```toml
//! [storage]
//! graph_db = "data/rooms.db"
//! item_catalog = "data/items.json"
//! npc_catalog = "data/npcs.json"
//!
//! [map]
//! grid_size = 11
//! raster_scale = 32
//!
//! [[characters]]
//! name = "Granny"
//! reliable_teleports = true
//!
//! [[characters.teleports]]
//! name = "cottage"
//! map_id = 3
//! x = 4
//! y = 5
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::mapper::{GridOptions, RasterOptions, TeleportLocation, TeleportRegistry};

/// Paths to the persisted graph and the optional item/NPC catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub graph_db: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc_catalog: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            graph_db: "data/rooms.db".to_string(),
            item_catalog: Some("data/items.json".to_string()),
            npc_catalog: Some("data/npcs.json".to_string()),
        }
    }
}

/// Map rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Cells per side of the text grid window.
    pub grid_size: usize,
    #[serde(default)]
    pub grid_offset_x: i64,
    #[serde(default)]
    pub grid_offset_y: i64,
    /// Pixels per room in raster output.
    pub raster_scale: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_size: 11,
            grid_offset_x: 0,
            grid_offset_y: 0,
            raster_scale: 32,
        }
    }
}

/// One teleport destination as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeleportEntry {
    pub name: String,
    pub map_id: i64,
    pub x: i64,
    pub y: i64,
}

/// One character's teleport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub name: String,
    /// Whether this character's teleports always succeed. Unreliable sets
    /// still route, but consumers prompt before sending the command.
    #[serde(default)]
    pub reliable_teleports: bool,
    #[serde(default)]
    pub teleports: Vec<TeleportEntry>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub characters: Vec<CharacterConfig>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("invalid TOML in {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file, refusing to clobber an existing
    /// one.
    pub async fn create_default(path: &str) -> Result<()> {
        if fs::try_exists(path).await.unwrap_or(false) {
            return Err(anyhow!("config file {path} already exists"));
        }
        let default = Config::default();
        let contents = toml::to_string_pretty(&default)?;
        fs::write(path, contents)
            .await
            .with_context(|| format!("failed to write {path}"))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.storage.graph_db.trim().is_empty() {
            return Err(anyhow!("storage.graph_db must not be empty"));
        }
        if self.map.grid_size == 0 {
            return Err(anyhow!("map.grid_size must be at least 1"));
        }
        if self.map.raster_scale < 4 {
            return Err(anyhow!("map.raster_scale must be at least 4"));
        }
        for character in &self.characters {
            if character.name.trim().is_empty() {
                return Err(anyhow!("character entries need a name"));
            }
            for teleport in &character.teleports {
                if teleport.name.trim().is_empty() {
                    return Err(anyhow!(
                        "teleport entries for {} need a name",
                        character.name
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the immutable teleport registry from the character sections.
    pub fn teleport_registry(&self) -> TeleportRegistry {
        let mut registry = TeleportRegistry::new();
        for character in &self.characters {
            let locations = character
                .teleports
                .iter()
                .map(|t| TeleportLocation {
                    name: t.name.clone(),
                    map_id: t.map_id,
                    x: t.x,
                    y: t.y,
                })
                .collect();
            registry =
                registry.with_character(&character.name, character.reliable_teleports, locations);
        }
        registry
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            map_size: self.map.grid_size,
            offset_x: self.map.grid_offset_x,
            offset_y: self.map.grid_offset_y,
        }
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            scale: self.map.raster_scale,
        }
    }
}
