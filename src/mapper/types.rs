use serde::{Deserialize, Serialize};

/// Room flag marking rooms that may never be the landing room of a
/// synthesized teleport edge.
pub const FLAG_NO_TELEPORT_TARGET: &str = "no-teleport-target";

/// A single room in the persisted graph.
///
/// `room_id` is the only stable cross-reference (typically a content hash).
/// `(map_id, xpos, ypos)` is unique within a map but coordinates on different
/// maps are unrelated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub room_id: String,
    pub map_id: i64,
    pub xpos: i64,
    pub ypos: i64,
    pub room_short: String,
    pub room_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl Room {
    pub fn new(
        room_id: impl Into<String>,
        map_id: i64,
        xpos: i64,
        ypos: i64,
        room_short: impl Into<String>,
        room_type: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            map_id,
            xpos,
            ypos,
            room_short: room_short.into(),
            room_type: room_type.into(),
            flags: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// A directed, named transition between two rooms.
///
/// Plain directional moves between same-map rooms have a cardinal unit
/// coordinate delta; doors, climbs and teleport words carry no coordinate
/// relationship at all. A reverse exit may be absent, differently named, or
/// lead elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exit {
    pub from_room_id: String,
    pub to_room_id: String,
    pub exit_command: String,
}

impl Exit {
    pub fn new(
        from_room_id: impl Into<String>,
        to_room_id: impl Into<String>,
        exit_command: impl Into<String>,
    ) -> Self {
        Self {
            from_room_id: from_room_id.into(),
            to_room_id: to_room_id.into(),
            exit_command: exit_command.into(),
        }
    }
}

/// A named fast-travel destination registered for a character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeleportLocation {
    pub name: String,
    pub map_id: i64,
    pub x: i64,
    pub y: i64,
}

/// A character's teleport set. `reliable` records whether the character's
/// shortcuts always succeed; an unreliable set is still routable, callers
/// are expected to prompt before auto-sending the command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterTeleports {
    pub reliable: bool,
    pub locations: Vec<TeleportLocation>,
}

impl Default for CharacterTeleports {
    /// Safe default for unknown characters: no shortcuts on offer, so the
    /// reliable flag can never wrongly greenlight an edge.
    fn default() -> Self {
        Self {
            reliable: true,
            locations: Vec::new(),
        }
    }
}

/// One atomic movement instruction plus the room it lands in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteStep {
    /// Exactly what must be sent to the game to perform this transition.
    pub exit_command: String,
    pub resulting_room_id: String,
    /// True when this step invokes a registered teleport rather than a
    /// normal exit. Callers use this (with the registry's reliable flag)
    /// to decide whether to prompt before sending.
    #[serde(default)]
    pub teleport: bool,
}

impl RouteStep {
    pub fn walk(exit_command: impl Into<String>, resulting_room_id: impl Into<String>) -> Self {
        Self {
            exit_command: exit_command.into(),
            resulting_room_id: resulting_room_id.into(),
            teleport: false,
        }
    }
}

/// An ordered route. Empty means "already at the target".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteResult {
    pub steps: Vec<RouteStep>,
}

impl RouteResult {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn uses_teleport(&self) -> bool {
        self.steps.iter().any(|s| s.teleport)
    }

    /// Render as the narration consumers display: `"n -> e -> climb wall"`.
    pub fn narrate(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.exit_command.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// A room matched by name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSearchResult {
    pub room_id: String,
    pub map_id: i64,
    pub xpos: i64,
    pub ypos: i64,
    pub room_short: String,
    pub room_type: String,
}

impl From<Room> for RoomSearchResult {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.room_id,
            map_id: room.map_id,
            xpos: room.xpos,
            ypos: room.ypos,
            room_short: room.room_short,
            room_type: room.room_type,
        }
    }
}

/// An item matched by name search, located via per-room shop/feature data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSearchResult {
    pub item_name: String,
    /// Where the item entry came from, e.g. "shop".
    pub source: String,
    pub room_id: String,
    pub map_id: i64,
    pub xpos: i64,
    pub ypos: i64,
    pub room_short: String,
}

/// An NPC matched by name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcSearchResult {
    pub npc_name: String,
    pub room_id: String,
    pub map_id: i64,
    pub xpos: i64,
    pub ypos: i64,
    pub room_short: String,
}
