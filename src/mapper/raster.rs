//! Raster map rendering.
//!
//! Draws one whole map as a bitmap at a configurable pixels-per-room scale:
//! a square per room, connector lines for plain directional exits, a marker
//! at the current room, and (optionally) a route polyline. The expensive
//! part, rasterizing every room of the map, is cached in a single slot keyed
//! by map id so repeated renders of the same map only redraw the overlay.
//! Marker pixel coordinates and the scale are exposed so the UI layer can
//! animate the position indicator and map clicks back to room coordinates.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{ImageOutputFormat, Rgba, RgbaImage};
use log::debug;

use crate::mapper::errors::MapperError;
use crate::mapper::store::RoomGraphStore;
use crate::mapper::types::RouteResult;

const COLOR_BACKGROUND: Rgba<u8> = Rgba([24, 24, 28, 255]);
const COLOR_ROOM_OUTSIDE: Rgba<u8> = Rgba([96, 160, 96, 255]);
const COLOR_ROOM_INSIDE: Rgba<u8> = Rgba([150, 150, 160, 255]);
const COLOR_CONNECTOR: Rgba<u8> = Rgba([90, 90, 100, 255]);
const COLOR_MARKER: Rgba<u8> = Rgba([230, 70, 70, 255]);
const COLOR_ROUTE: Rgba<u8> = Rgba([240, 200, 60, 255]);

/// Raster output settings.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Pixels per room cell.
    pub scale: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 32 }
    }
}

/// A rendered raster map plus the geometry needed to place overlays and map
/// clicks back to room coordinates.
#[derive(Debug, Clone)]
pub struct RasterMap {
    /// PNG-encoded image bytes.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
    /// Pixels per room cell, the logical-to-pixel scale factor.
    pub scale: u32,
    /// Map id the image belongs to.
    pub map_id: i64,
    /// Room coordinates of the image's top-left cell.
    pub origin_x: i64,
    pub origin_y_top: i64,
    /// Pixel center of the current room's cell.
    pub marker_px: (u32, u32),
}

impl RasterMap {
    /// Room coordinates of the cell under a pixel, for click-to-select.
    pub fn room_coordinates_at(&self, px: u32, py: u32) -> (i64, i64) {
        let x = self.origin_x + (px / self.scale) as i64;
        let y = self.origin_y_top - (py / self.scale) as i64;
        (x, y)
    }
}

struct BaseImage {
    map_id: i64,
    scale: u32,
    origin_x: i64,
    origin_y_top: i64,
    image: Arc<RgbaImage>,
}

/// Raster renderer with a single-slot base-image cache.
///
/// The slot is replaced wholesale under a short lock; readers clone the Arc
/// out, so a concurrent render never sees a torn image, at worst a stale one
/// for the same map id, which is harmless because the graph only changes
/// offline.
pub struct RasterRenderer {
    base_cache: Mutex<Option<Arc<BaseImage>>>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self {
            base_cache: Mutex::new(None),
        }
    }

    /// Render the map containing `room_id`, marking the room's position and
    /// overlaying `route` when supplied.
    pub fn render(
        &self,
        store: &RoomGraphStore,
        room_id: &str,
        route: Option<&RouteResult>,
        options: &RasterOptions,
    ) -> Result<RasterMap, MapperError> {
        let room = store
            .get_room(room_id)?
            .ok_or_else(|| MapperError::RoomNotFound(room_id.to_string()))?;
        let scale = options.scale.max(4);

        let base = self.base_image(store, room.map_id, scale)?;
        let mut image = (*base.image).clone();

        let to_px = |x: i64, y: i64| -> (u32, u32) {
            let cx = (x - base.origin_x) as u32 * scale + scale / 2;
            let cy = (base.origin_y_top - y) as u32 * scale + scale / 2;
            (cx, cy)
        };

        if let Some(route) = route {
            let mut points: Vec<(i64, i64, i64)> = vec![(room.map_id, room.xpos, room.ypos)];
            for step in &route.steps {
                if let Some(step_room) = store.get_room(&step.resulting_room_id)? {
                    points.push((step_room.map_id, step_room.xpos, step_room.ypos));
                }
            }
            for pair in points.windows(2) {
                let (map_a, xa, ya) = pair[0];
                let (map_b, xb, yb) = pair[1];
                // a teleport jump between coordinate spaces is a
                // discontinuity, never a straight line
                if map_a != map_b || map_a != base.map_id {
                    continue;
                }
                let (px_a, py_a) = to_px(xa, ya);
                let (px_b, py_b) = to_px(xb, yb);
                draw_line(&mut image, px_a, py_a, px_b, py_b, COLOR_ROUTE);
            }
        }

        let marker_px = to_px(room.xpos, room.ypos);
        draw_marker(&mut image, marker_px, scale, COLOR_MARKER);

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

        Ok(RasterMap {
            png,
            width: image.width(),
            height: image.height(),
            mime_type: "image/png",
            scale,
            map_id: base.map_id,
            origin_x: base.origin_x,
            origin_y_top: base.origin_y_top,
            marker_px,
        })
    }

    /// Fetch the cached base image for `map_id` at `scale`, rebuilding it on
    /// a miss and swapping it into the slot.
    fn base_image(
        &self,
        store: &RoomGraphStore,
        map_id: i64,
        scale: u32,
    ) -> Result<Arc<BaseImage>, MapperError> {
        {
            let slot = self.base_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(base) = slot.as_ref() {
                if base.map_id == map_id && base.scale == scale {
                    return Ok(Arc::clone(base));
                }
            }
        }

        // built outside the lock; a racing render of another map just wins
        // the slot last
        let base = Arc::new(build_base_image(store, map_id, scale)?);
        let mut slot = self.base_cache.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Arc::clone(&base));
        Ok(base)
    }
}

fn build_base_image(
    store: &RoomGraphStore,
    map_id: i64,
    scale: u32,
) -> Result<BaseImage, MapperError> {
    let (x_min, x_max, y_min, y_max) = store
        .map_bounds(map_id)?
        .ok_or_else(|| MapperError::RoomNotFound(format!("map {map_id} has no rooms")))?;

    let cols = (x_max - x_min + 1) as u32;
    let rows = (y_max - y_min + 1) as u32;
    let mut image = RgbaImage::from_pixel(cols * scale, rows * scale, COLOR_BACKGROUND);

    let rooms = store.rooms_on_map(map_id)?;
    let ids: HashSet<String> = rooms.keys().cloned().collect();
    let exits = store.exits_among(&ids)?;
    debug!(
        "raster base for map {map_id}: {}x{} px, {} rooms, {} exits",
        image.width(),
        image.height(),
        rooms.len(),
        exits.len()
    );

    let cell_px = |x: i64, y: i64| -> (u32, u32) {
        ((x - x_min) as u32 * scale, (y_max - y) as u32 * scale)
    };

    for exit in &exits {
        let (Some(from), Some(to)) = (rooms.get(&exit.from_room_id), rooms.get(&exit.to_room_id))
        else {
            continue;
        };
        let dx = to.xpos - from.xpos;
        let dy = to.ypos - from.ypos;
        if !matches!((dx, dy), (1, 0) | (-1, 0) | (0, 1) | (0, -1)) {
            continue;
        }
        let (ax, ay) = cell_px(from.xpos, from.ypos);
        let (bx, by) = cell_px(to.xpos, to.ypos);
        draw_line(
            &mut image,
            ax + scale / 2,
            ay + scale / 2,
            bx + scale / 2,
            by + scale / 2,
            COLOR_CONNECTOR,
        );
    }

    // rooms painted after connectors so squares sit on top of the lines
    let margin = scale / 4;
    for room in rooms.values() {
        let (px, py) = cell_px(room.xpos, room.ypos);
        let color = if room.room_type == "outside" {
            COLOR_ROOM_OUTSIDE
        } else {
            COLOR_ROOM_INSIDE
        };
        fill_rect(
            &mut image,
            px + margin,
            py + margin,
            scale - 2 * margin,
            scale - 2 * margin,
            color,
        );
    }

    Ok(BaseImage {
        map_id,
        scale,
        origin_x: x_min,
        origin_y_top: y_max,
        image: Arc::new(image),
    })
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..(y + h).min(image.height()) {
        for px in x..(x + w).min(image.width()) {
            image.put_pixel(px, py, color);
        }
    }
}

fn draw_marker(image: &mut RgbaImage, center: (u32, u32), scale: u32, color: Rgba<u8>) {
    let r = (scale / 6).max(2);
    let (cx, cy) = center;
    fill_rect(
        image,
        cx.saturating_sub(r),
        cy.saturating_sub(r),
        2 * r,
        2 * r,
        color,
    );
}

/// Bresenham line clipped to the image.
fn draw_line(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let (mut x0, mut y0) = (x0 as i64, y0 as i64);
    let (x1, y1) = (x1 as i64, y1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as u32) < image.width() && (y0 as u32) < image.height() {
            image.put_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::types::{Exit, Room, RouteStep};

    fn small_map_store() -> RoomGraphStore {
        let store = RoomGraphStore::open_in_memory().unwrap();
        store
            .put_room(&Room::new("a", 1, 0, 0, "Corner", "outside"))
            .unwrap();
        store
            .put_room(&Room::new("b", 1, 1, 0, "Middle", "outside"))
            .unwrap();
        store
            .put_room(&Room::new("c", 1, 2, 0, "Far End", "inside"))
            .unwrap();
        store.put_exit(&Exit::new("a", "b", "east")).unwrap();
        store.put_exit(&Exit::new("b", "c", "east")).unwrap();
        store
    }

    #[test]
    fn image_sizes_to_the_map_bounding_box() {
        let store = small_map_store();
        let renderer = RasterRenderer::new();
        let options = RasterOptions { scale: 10 };
        let map = renderer.render(&store, "a", None, &options).unwrap();
        assert_eq!(map.width, 30); // 3 cells wide
        assert_eq!(map.height, 10); // 1 cell tall
        assert_eq!(map.mime_type, "image/png");
        assert!(!map.png.is_empty());
    }

    #[test]
    fn marker_sits_at_the_current_room_center() {
        let store = small_map_store();
        let renderer = RasterRenderer::new();
        let options = RasterOptions { scale: 10 };
        let map = renderer.render(&store, "b", None, &options).unwrap();
        assert_eq!(map.marker_px, (15, 5));
        assert_eq!(map.room_coordinates_at(15, 5), (1, 0));
    }

    #[test]
    fn base_image_is_reused_for_the_same_map() {
        let store = small_map_store();
        let renderer = RasterRenderer::new();
        let options = RasterOptions::default();
        let first = renderer.render(&store, "a", None, &options).unwrap();
        let second = renderer.render(&store, "c", None, &options).unwrap();
        assert_eq!(first.width, second.width);
        assert_eq!(first.origin_x, second.origin_x);
        let slot = renderer.base_cache.lock().unwrap();
        assert!(slot.is_some(), "cache slot should be populated");
    }

    #[test]
    fn route_overlay_renders_without_panicking() {
        let store = small_map_store();
        let renderer = RasterRenderer::new();
        let route = RouteResult {
            steps: vec![RouteStep::walk("east", "b"), RouteStep::walk("east", "c")],
        };
        let map = renderer
            .render(&store, "a", Some(&route), &RasterOptions::default())
            .unwrap();
        assert!(!map.png.is_empty());
    }

    #[test]
    fn unknown_room_fails_instead_of_rendering_blank() {
        let store = small_map_store();
        let renderer = RasterRenderer::new();
        assert!(matches!(
            renderer.render(&store, "void", None, &RasterOptions::default()),
            Err(MapperError::RoomNotFound(_))
        ));
    }
}
