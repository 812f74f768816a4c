//! Sqlite-backed persistence for the room graph.
//!
//! The store is read-mostly: all graph data is produced offline by the
//! map-maintenance tooling, and the engine only ever reads at query time.
//! Write operations (`put_room`, `put_exit`, `init_schema`) exist for that
//! tooling and for tests.
//!
//! Schema (shared with the offline map-maintenance tooling, do not change
//! column order):
//!
//! ```sql
//! rooms(room_id TEXT PRIMARY KEY, map_id INTEGER, xpos INTEGER, ypos INTEGER,
//!       room_short TEXT, room_type TEXT, flags TEXT)
//! room_exits(room_id TEXT, connect_id TEXT, exit_command TEXT)
//! ```

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags, Row};

use crate::mapper::errors::MapperError;
use crate::mapper::types::{Exit, Room};

/// Helper builder so tests and tooling can easily create throwaway stores.
pub struct RoomGraphStoreBuilder {
    path: Option<PathBuf>,
    create_schema: bool,
}

impl RoomGraphStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            create_schema: true,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            create_schema: true,
        }
    }

    /// Opt out of schema creation (useful when pointing at an existing db).
    pub fn without_schema(mut self) -> Self {
        self.create_schema = false;
        self
    }

    pub fn open(self) -> Result<RoomGraphStore, MapperError> {
        let conn = match &self.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        let store = RoomGraphStore {
            conn: Mutex::new(conn),
        };
        if self.create_schema {
            store.init_schema()?;
        }
        Ok(store)
    }
}

/// Read-mostly sqlite store holding rooms and directed exits.
///
/// A single connection guarded by a mutex serializes access; queries are
/// short indexed reads, and nothing mutates the graph at runtime, so
/// concurrent callers on worker threads only contend briefly.
pub struct RoomGraphStore {
    conn: Mutex<Connection>,
}

impl RoomGraphStore {
    /// Open an existing graph database read-only. Fails with
    /// `StoreUnavailable` when the file is missing or not a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MapperError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store with a fresh schema.
    pub fn open_in_memory() -> Result<Self, MapperError> {
        RoomGraphStoreBuilder::in_memory().open()
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock means a panic mid-read; the connection holds no
        // partial write state, so recovering the guard is safe.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create the two graph tables and their lookup indexes if absent.
    pub fn init_schema(&self) -> Result<(), MapperError> {
        let conn = self.lock();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS rooms (
                 room_id TEXT PRIMARY KEY,
                 map_id INTEGER,
                 xpos INTEGER,
                 ypos INTEGER,
                 room_short TEXT,
                 room_type TEXT,
                 flags TEXT
             );
             CREATE TABLE IF NOT EXISTS room_exits (
                 room_id TEXT,
                 connect_id TEXT,
                 exit_command TEXT
             );
             CREATE INDEX IF NOT EXISTS idx_rooms_map_pos
                 ON rooms (map_id, xpos, ypos);
             CREATE INDEX IF NOT EXISTS idx_room_exits_from
                 ON room_exits (room_id);",
        )?;
        Ok(())
    }

    fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
        let flags: Option<String> = row.get(6)?;
        Ok(Room {
            room_id: row.get(0)?,
            map_id: row.get(1)?,
            xpos: row.get(2)?,
            ypos: row.get(3)?,
            room_short: row.get(4)?,
            room_type: row.get(5)?,
            flags: flags
                .map(|f| f.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    const ROOM_COLUMNS: &'static str =
        "room_id, map_id, xpos, ypos, room_short, room_type, flags";

    /// Fetch a room by id. Absent rooms yield `Ok(None)`; callers surface
    /// the not-found condition themselves.
    pub fn get_room(&self, room_id: &str) -> Result<Option<Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms WHERE room_id = ?1",
            Self::ROOM_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![room_id], Self::room_from_row)?;
        match rows.next() {
            Some(room) => Ok(Some(room?)),
            None => Ok(None),
        }
    }

    /// All rooms of one map inside the inclusive coordinate window, keyed by
    /// room id. Rooms on other maps are excluded even when their coordinates
    /// alias into the window.
    pub fn rooms_in_area(
        &self,
        map_id: i64,
        x_range: RangeInclusive<i64>,
        y_range: RangeInclusive<i64>,
    ) -> Result<HashMap<String, Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms
             WHERE map_id = ?1 AND xpos BETWEEN ?2 AND ?3 AND ypos BETWEEN ?4 AND ?5",
            Self::ROOM_COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![
                map_id,
                x_range.start(),
                x_range.end(),
                y_range.start(),
                y_range.end()
            ],
            Self::room_from_row,
        )?;
        let mut out = HashMap::new();
        for room in rows {
            let room = room?;
            out.insert(room.room_id.clone(), room);
        }
        Ok(out)
    }

    /// Batched exit lookup: every stored exit whose endpoints both fall in
    /// `room_ids`. One query for the whole render window instead of one per
    /// room.
    pub fn exits_among(&self, room_ids: &HashSet<String>) -> Result<Vec<Exit>, MapperError> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; room_ids.len()].join(", ");
        let sql = format!(
            "SELECT room_id, connect_id, exit_command FROM room_exits
             WHERE room_id IN ({placeholders})
             ORDER BY room_id, exit_command, connect_id"
        );
        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let mut ids: Vec<&String> = room_ids.iter().collect();
        ids.sort();
        let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(Exit {
                from_room_id: row.get(0)?,
                to_room_id: row.get(1)?,
                exit_command: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for exit in rows {
            let exit = exit?;
            if room_ids.contains(&exit.to_room_id) {
                out.push(exit);
            }
        }
        Ok(out)
    }

    /// Outgoing exits of one room in a stable order (command, then
    /// destination id). The route search relies on this ordering for
    /// deterministic tie-breaks.
    pub fn exits_from(&self, room_id: &str) -> Result<Vec<Exit>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT room_id, connect_id, exit_command FROM room_exits
             WHERE room_id = ?1
             ORDER BY exit_command, connect_id",
        )?;
        let rows = stmt.query_map(params![room_id], |row| {
            Ok(Exit {
                from_room_id: row.get(0)?,
                to_room_id: row.get(1)?,
                exit_command: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for exit in rows {
            out.push(exit?);
        }
        Ok(out)
    }

    /// Exact coordinate lookup on one map.
    pub fn find_by_coordinates(
        &self,
        map_id: i64,
        x: i64,
        y: i64,
    ) -> Result<Option<Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms
             WHERE map_id = ?1 AND xpos = ?2 AND ypos = ?3
             ORDER BY room_id",
            Self::ROOM_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![map_id, x, y], Self::room_from_row)?;
        match rows.next() {
            Some(room) => Ok(Some(room?)),
            None => Ok(None),
        }
    }

    /// Euclidean-nearest room on a map, used for click-to-select in the UI
    /// and for landing teleports whose coordinates sit between rooms.
    /// Ties break on room id.
    pub fn nearest_room(&self, map_id: i64, x: i64, y: i64) -> Result<Option<Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms
             WHERE map_id = ?1
             ORDER BY (xpos - ?2) * (xpos - ?2) + (ypos - ?3) * (ypos - ?3), room_id
             LIMIT 1",
            Self::ROOM_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![map_id, x, y], Self::room_from_row)?;
        match rows.next() {
            Some(room) => Ok(Some(room?)),
            None => Ok(None),
        }
    }

    /// Coordinate bounding box `(x_min, x_max, y_min, y_max)` of one map,
    /// or `None` when the map has no rooms. Drives raster canvas sizing.
    pub fn map_bounds(&self, map_id: i64) -> Result<Option<(i64, i64, i64, i64)>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT MIN(xpos), MAX(xpos), MIN(ypos), MAX(ypos) FROM rooms WHERE map_id = ?1",
        )?;
        let bounds: (Option<i64>, Option<i64>, Option<i64>, Option<i64>) =
            stmt.query_row(params![map_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
        Ok(match bounds {
            (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => {
                Some((x_min, x_max, y_min, y_max))
            }
            _ => None,
        })
    }

    /// Every room of one map, keyed by room id.
    pub fn rooms_on_map(&self, map_id: i64) -> Result<HashMap<String, Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms WHERE map_id = ?1",
            Self::ROOM_COLUMNS
        ))?;
        let rows = stmt.query_map(params![map_id], Self::room_from_row)?;
        let mut out = HashMap::new();
        for room in rows {
            let room = room?;
            out.insert(room.room_id.clone(), room);
        }
        Ok(out)
    }

    /// Case-insensitive substring match on room display names, ordered by
    /// room id so repeated queries return identical lists.
    pub fn search_rooms_by_name(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<Room>, MapperError> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM rooms
             WHERE instr(lower(room_short), lower(?1)) > 0
             ORDER BY room_id
             LIMIT ?2",
            Self::ROOM_COLUMNS
        ))?;
        let rows = stmt.query_map(params![fragment, limit as i64], Self::room_from_row)?;
        let mut out = Vec::new();
        for room in rows {
            out.push(room?);
        }
        Ok(out)
    }

    /// Insert or replace a room. Offline tooling and tests only.
    pub fn put_room(&self, room: &Room) -> Result<(), MapperError> {
        let flags = if room.flags.is_empty() {
            None
        } else {
            Some(room.flags.join(" "))
        };
        let conn = self.lock();
        conn.execute(
            "INSERT OR REPLACE INTO rooms (room_id, map_id, xpos, ypos, room_short, room_type, flags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                room.room_id,
                room.map_id,
                room.xpos,
                room.ypos,
                room.room_short,
                room.room_type,
                flags
            ],
        )?;
        Ok(())
    }

    /// Insert a directed exit. Offline tooling and tests only.
    pub fn put_exit(&self, exit: &Exit) -> Result<(), MapperError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO room_exits (room_id, connect_id, exit_command) VALUES (?1, ?2, ?3)",
            params![exit.from_room_id, exit.to_room_id, exit.exit_command],
        )?;
        Ok(())
    }

    pub fn room_count(&self) -> Result<usize, MapperError> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
