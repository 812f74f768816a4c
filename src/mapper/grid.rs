//! Textual mini-map rendering.
//!
//! Renders a bounded `map_size x map_size` window of one map as an ASCII
//! grid: `@` marks the current room, `o` other known rooms, `-` and `|`
//! connect orthogonally adjacent rooms whose exit delta is exactly one
//! cardinal unit. Non-geometric exits (doors, climbs, teleport words) simply
//! draw no connector.

use std::collections::HashSet;
use std::fmt;

use crate::mapper::errors::MapperError;
use crate::mapper::store::RoomGraphStore;

/// Window settings for the text renderer.
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Cells per side of the rendered window.
    pub map_size: usize,
    /// Shift of the window center relative to the current room.
    pub offset_x: i64,
    pub offset_y: i64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            map_size: 11,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

/// A rendered text map: a header line plus exactly `2 * map_size - 1` body
/// lines, every line right-trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    pub header: String,
    pub lines: Vec<String>,
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Render the neighborhood of `room_id` as a text grid.
pub fn render_grid(
    store: &RoomGraphStore,
    room_id: &str,
    options: &GridOptions,
) -> Result<GridMap, MapperError> {
    let room = store
        .get_room(room_id)?
        .ok_or_else(|| MapperError::RoomNotFound(room_id.to_string()))?;

    let size = options.map_size.max(1) as i64;
    let half = size / 2;
    let center_x = room.xpos + options.offset_x;
    let center_y = room.ypos + options.offset_y;
    let x_min = center_x - half;
    let x_max = x_min + size - 1;
    let y_min = center_y - half;
    let y_max = y_min + size - 1;

    let rooms = store.rooms_in_area(room.map_id, x_min..=x_max, y_min..=y_max)?;
    let ids: HashSet<String> = rooms.keys().cloned().collect();
    let exits = store.exits_among(&ids)?;

    // Interleaved canvas: even rows/columns are room cells, odd are
    // connector slots, giving 2 * size - 1 lines.
    let side = (2 * size - 1) as usize;
    let mut canvas = vec![vec![' '; side]; side];

    for r in rooms.values() {
        let col = 2 * (r.xpos - x_min) as usize;
        let row = 2 * (y_max - r.ypos) as usize;
        canvas[row][col] = if r.room_id == room.room_id { '@' } else { 'o' };
    }

    for exit in &exits {
        let (Some(from), Some(to)) = (rooms.get(&exit.from_room_id), rooms.get(&exit.to_room_id))
        else {
            continue;
        };
        let dx = to.xpos - from.xpos;
        let dy = to.ypos - from.ypos;
        // only plain directional moves get a connector glyph
        let glyph = match (dx, dy) {
            (1, 0) | (-1, 0) => '-',
            (0, 1) | (0, -1) => '|',
            _ => continue,
        };
        let col = (2 * (from.xpos - x_min) + dx) as usize;
        let row = (2 * (y_max - from.ypos) - dy) as usize;
        canvas[row][col] = glyph;
    }

    let lines: Vec<String> = canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect();

    let header = format!(
        "{} ({},{}) map {} [x {}..{}, y {}..{}]",
        room.room_short, room.xpos, room.ypos, room.map_id, x_min, x_max, y_min, y_max
    );

    Ok(GridMap { header, lines })
}
