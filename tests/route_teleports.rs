//! Teleport splicing: preference over long walks, landing-room resolution,
//! reliability surfacing, and the start-room-only rule.

use mudmap::mapper::{
    MapperError, Room, RouteFinder, TeleportLocation, TeleportRegistry, TELEPORT_COST,
};

mod common;

fn hub(name: &str, map_id: i64, x: i64, y: i64) -> TeleportLocation {
    TeleportLocation {
        name: name.to_string(),
        map_id,
        x,
        y,
    }
}

#[test]
fn teleport_beats_a_walk_longer_than_its_cost() {
    let store = common::city_store();
    // corridor far east of the square, walk distance well above TELEPORT_COST
    let len = TELEPORT_COST as usize + 60;
    common::add_corridor(&store, 1, 100, 0, "walk", len);
    store
        .put_exit(&mudmap::mapper::Exit::new("drum", "walk0", "east"))
        .unwrap();
    store
        .put_exit(&mudmap::mapper::Exit::new("walk0", "drum", "west"))
        .unwrap();

    let far_end = format!("walk{}", len - 1);
    let registry = TeleportRegistry::new().with_character(
        "granny",
        true,
        vec![
            hub("home", 1, 0, 0),
            hub("garden", 1, 100 + len as i64 - 2, 0),
        ],
    );
    let finder = RouteFinder::new(&store, &registry);
    let route = finder
        .find_route("square", &far_end, true, Some("granny"))
        .unwrap();

    assert!(
        route.steps[0].exit_command.contains("garden"),
        "expected teleport first step, got {}",
        route.steps[0].exit_command
    );
    assert!(route.steps[0].teleport);
    assert!(
        route.len() < 10,
        "teleport route should be short, got {} steps",
        route.len()
    );

    // the same trek on foot when teleports are off
    let walked = finder
        .find_route("square", &far_end, false, Some("granny"))
        .unwrap();
    assert!(walked.len() > TELEPORT_COST as usize);
    assert!(!walked.uses_teleport());
}

#[test]
fn teleport_lands_on_nearest_room_when_coordinates_are_between_rooms() {
    let store = common::city_store();
    let registry = TeleportRegistry::new().with_character(
        "rincewind",
        true,
        // no room at (2,1); bakery (2,0) is the nearest on map 1
        vec![hub("luggage", 1, 2, 1)],
    );
    let finder = RouteFinder::new(&store, &registry);
    let route = finder
        .find_route("library", "drum", true, Some("rincewind"))
        .unwrap();
    // walking library -> drum is 5 steps; teleport would be 251, so the
    // teleport loses here, but the landing resolution must not error
    assert_eq!(route.len(), 5);

    // with the walk severed the teleport is the only way
    let island_registry = TeleportRegistry::new()
        .with_character("twoflower", true, vec![hub("beach", 2, 0, 0)]);
    let finder = RouteFinder::new(&store, &island_registry);
    let route = finder
        .find_route("square", "isle_b", true, Some("twoflower"))
        .unwrap();
    assert_eq!(route.steps[0].exit_command, "teleport beach");
    assert_eq!(route.steps[0].resulting_room_id, "isle_a");
    assert_eq!(route.steps[1].exit_command, "east");
}

#[test]
fn unreliable_teleports_still_route_but_are_flagged() {
    let store = common::city_store();
    let registry = TeleportRegistry::new()
        .with_character("eric", false, vec![hub("beach", 2, 0, 0)]);
    let finder = RouteFinder::new(&store, &registry);
    let route = finder
        .find_route("square", "isle_a", true, Some("eric"))
        .unwrap();
    assert!(route.uses_teleport(), "teleport edge must not be suppressed");

    // the caller-side warning channel: the registry's reliable flag
    let set = registry.for_character(Some("eric"));
    assert!(!set.reliable);
}

#[test]
fn teleports_are_only_usable_from_the_start_room() {
    let store = common::city_store();
    // hub lands on the island; target requires walking first if teleports
    // were usable mid-route, which they are not
    let registry = TeleportRegistry::new()
        .with_character("mort", true, vec![hub("beach", 2, 0, 0)]);
    let finder = RouteFinder::new(&store, &registry);
    let route = finder
        .find_route("drum", "isle_b", true, Some("mort"))
        .unwrap();
    for (i, step) in route.steps.iter().enumerate() {
        if step.teleport {
            assert_eq!(i, 0, "teleport step appeared mid-route at index {i}");
        }
    }
}

#[test]
fn teleports_disabled_means_no_virtual_edges_at_all() {
    let store = common::city_store();
    let registry = TeleportRegistry::new()
        .with_character("vimes", true, vec![hub("beach", 2, 0, 0)]);
    let finder = RouteFinder::new(&store, &registry);
    assert!(matches!(
        finder.find_route("square", "isle_a", false, Some("vimes")),
        Err(MapperError::NoRouteFound { .. })
    ));
}

#[test]
fn teleport_for_unknown_character_offers_nothing() {
    let store = common::city_store();
    let registry = TeleportRegistry::new()
        .with_character("vimes", true, vec![hub("beach", 2, 0, 0)]);
    let finder = RouteFinder::new(&store, &registry);
    assert!(matches!(
        finder.find_route("square", "isle_a", true, Some("nobody")),
        Err(MapperError::NoRouteFound { .. })
    ));
}

#[test]
fn teleport_location_on_an_empty_map_is_skipped() {
    let store = common::city_store();
    store
        .put_room(&Room::new("crypt", 3, 0, 0, "Crypt", "inside"))
        .unwrap();
    let registry = TeleportRegistry::new().with_character(
        "susan",
        true,
        vec![hub("void", 9, 0, 0), hub("crypt", 3, 0, 0)],
    );
    let finder = RouteFinder::new(&store, &registry);
    // "void" points at map 9 which has no rooms; it must be skipped while
    // "crypt" still works
    let route = finder
        .find_route("square", "crypt", true, Some("susan"))
        .unwrap();
    assert_eq!(route.narrate(), "teleport crypt");
}
