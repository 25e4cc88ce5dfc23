//! Reference content for magic-rpg.
//!
//! Everything here is plain extension-contract code: skills, reactions, and
//! scripts registered through [`install`], plus a small starter world. The
//! engine knows nothing about rooms, doors, or shouting.

/// Object helpers and well-known state keys.
pub mod helpers;
/// Reactions: `look_visible`, `go_can_go`, `listen_can_hear`.
pub mod reactions;
/// Scripts: `shouter_on_tick`.
pub mod scripts;
/// Skills: `look`, `go`, `say`, `create`.
pub mod skills;
/// The starter world.
pub mod world;

use mr_engine::{Engine, EngineResult};

/// Re-exports of the helper functions.
pub use helpers::{create_object, create_object_with_id, find_target, in_location, visible_to};
/// Re-export of [`world::seed_world`].
pub use world::seed_world;

/// Register every reference skill, reaction, and script. Skills go first so
/// reactions can resolve them.
pub fn install(engine: &mut Engine) -> EngineResult<()> {
    for skill in skills::all() {
        engine.add_skill(skill);
    }
    for reaction in reactions::all() {
        engine.add_reaction(reaction)?;
    }
    for script in scripts::all() {
        engine.add_script(script);
    }
    Ok(())
}

/// A fresh engine with the reference content installed and the starter
/// world seeded. Returns the engine and the hero's ID.
pub fn starter(config: mr_engine::EngineConfig) -> EngineResult<(Engine, mr_core::EntityId)> {
    let mut engine = Engine::new(config);
    install(&mut engine)?;
    let hero = seed_world(&mut engine)?;
    Ok((engine, hero))
}
