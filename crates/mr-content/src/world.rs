use mr_core::{EntityId, Value};
use mr_engine::{Engine, EngineResult, TICK_EVENT};
use tracing::debug;

use crate::helpers::{DESTINATION, create_object_with_id};
use crate::reactions::{GO_CAN_GO, LISTEN_CAN_HEAR, LOOK_VISIBLE};
use crate::scripts::{LAST_TICK, SHOUT_FREQUENCY, SHOUTER_ON_TICK};
use crate::skills::{CREATE, GO, LOOK, SAY};

/// ID of the small starting room.
pub const ROOM: &str = "room";
/// ID of the big room behind the door.
pub const BIG_ROOM: &str = "big-room";
/// ID of the player avatar.
pub const HERO: &str = "hero";
/// ID of the door from the small room to the big one.
pub const DOOR_TO_BIG_ROOM: &str = "door-to-big-room";
/// ID of the door from the big room back.
pub const DOOR_TO_ROOM: &str = "door-to-room";
/// ID of the box in the small room.
pub const BOX: &str = "box";
/// ID of the shouter in the small room.
pub const SHOUTER: &str = "shouter";

const BOX_DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
    nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Build the two-room starter world into an engine that has the reference
/// content installed. Returns the hero's ID.
pub fn seed_world(engine: &mut Engine) -> EngineResult<EntityId> {
    let room = create_object_with_id(engine, ROOM, "Room", "A small room.", None)?;
    let big_room =
        create_object_with_id(engine, BIG_ROOM, "Big Room", "A much bigger room.", None)?;

    let to_big_room =
        create_object_with_id(engine, DOOR_TO_BIG_ROOM, "door", "A big door.", Some(&room))?;
    engine
        .entity_mut(&to_big_room)?
        .set(DESTINATION, big_room.as_str());
    let to_room = create_object_with_id(
        engine,
        DOOR_TO_ROOM,
        "door",
        "A little door.",
        Some(&big_room),
    )?;
    engine.entity_mut(&to_room)?.set(DESTINATION, room.as_str());

    let hero = create_object_with_id(engine, HERO, "Hero", "You look very handsome.", Some(&room))?;
    let crate_box = create_object_with_id(engine, BOX, "Box", BOX_DESCRIPTION, Some(&room))?;
    let shouter = create_object_with_id(
        engine,
        SHOUTER,
        "Shouter",
        "An annoying shouty guy.",
        Some(&room),
    )?;
    {
        let entity = engine.entity_mut(&shouter)?;
        entity.set(LAST_TICK, Value::Float(0.0));
        entity.set(SHOUT_FREQUENCY, Value::Float(5.0));
    }
    engine.register_event(TICK_EVENT, shouter.clone(), SHOUTER_ON_TICK);

    engine.imbue_skills(&shouter, [SAY])?;
    engine.imbue_reactions(&shouter, [LOOK_VISIBLE])?;
    engine.imbue_skills(&hero, [LOOK, CREATE, GO, SAY])?;
    engine.imbue_reactions(&hero, [LOOK_VISIBLE, LISTEN_CAN_HEAR])?;
    for id in [&room, &big_room, &crate_box] {
        engine.imbue_reaction(id, LOOK_VISIBLE)?;
    }
    for id in [&to_big_room, &to_room] {
        engine.imbue_reactions(id, [LOOK_VISIBLE, GO_CAN_GO])?;
    }

    debug!(entities = engine.registry().len(), "seeded world");
    Ok(hero)
}
