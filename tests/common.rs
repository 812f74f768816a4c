//! Test fixtures: a small two-map world.
//!
//! Map 1 is a little city: an east-west street off the square and a
//! north-south run up to the library, plus a trapdoor into a cellar that has
//! no coordinate relationship with the street. Map 2 is an island pair with
//! no exits to map 1.
//!
//! ```text
//!   library(0,2)
//!   temple(0,1)
//!   square(0,0) - market(1,0) - bakery(2,0) - drum(3,0)   cellar(20,20)
//! ```

use mudmap::mapper::{Exit, Room, RoomGraphStore};

pub fn city_store() -> RoomGraphStore {
    let store = RoomGraphStore::open_in_memory().expect("in-memory store");
    let rooms = [
        Room::new("square", 1, 0, 0, "Sator Square", "outside"),
        Room::new("market", 1, 1, 0, "Market Street", "outside"),
        Room::new("bakery", 1, 2, 0, "Gimlet's Bakery", "inside"),
        Room::new("drum", 1, 3, 0, "Mended Drum", "inside"),
        Room::new("temple", 1, 0, 1, "Small Gods Temple", "inside"),
        Room::new("library", 1, 0, 2, "Unseen Library", "inside"),
        Room::new("cellar", 1, 20, 20, "Drum Cellar", "inside"),
        Room::new("isle_a", 2, 0, 0, "Windward Beach", "outside"),
        Room::new("isle_b", 2, 1, 0, "Leeward Beach", "outside"),
    ];
    for room in &rooms {
        store.put_room(room).expect("put room");
    }
    let both_ways = [
        ("square", "market", "east", "west"),
        ("market", "bakery", "east", "west"),
        ("bakery", "drum", "east", "west"),
        ("square", "temple", "north", "south"),
        ("temple", "library", "north", "south"),
        ("isle_a", "isle_b", "east", "west"),
    ];
    for (a, b, fwd, back) in both_ways {
        store.put_exit(&Exit::new(a, b, fwd)).expect("put exit");
        store.put_exit(&Exit::new(b, a, back)).expect("put exit");
    }
    // non-geometric exits: the trapdoor ignores coordinates entirely
    store
        .put_exit(&Exit::new("drum", "cellar", "enter trapdoor"))
        .expect("put exit");
    store
        .put_exit(&Exit::new("cellar", "drum", "climb ladder"))
        .expect("put exit");
    store
}

/// Append a west-to-east corridor of `len` rooms on `map_id` starting at
/// `(x0, y0)`, ids `prefix0..prefix{len-1}`, linked both ways.
#[allow(dead_code)] // not every integration file walks a corridor
pub fn add_corridor(store: &RoomGraphStore, map_id: i64, x0: i64, y0: i64, prefix: &str, len: usize) {
    for i in 0..len {
        let id = format!("{prefix}{i}");
        store
            .put_room(&Room::new(
                &id,
                map_id,
                x0 + i as i64,
                y0,
                format!("Corridor {i}"),
                "outside",
            ))
            .expect("put room");
        if i > 0 {
            let prev = format!("{prefix}{}", i - 1);
            store.put_exit(&Exit::new(&prev, &id, "east")).expect("put exit");
            store.put_exit(&Exit::new(&id, &prev, "west")).expect("put exit");
        }
    }
}
