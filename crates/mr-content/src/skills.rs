use mr_core::{Color, EntityId, Mapping, Message, SkillId, StyledText, Value};
use mr_engine::{Engine, EngineResult, Skill};

use crate::helpers::{
    DESCRIPTION, LOCATION, NAME, answer_str, answers_to, create_object, find_target,
    in_location, location_of, visible_to,
};

/// Skill name: describe the surroundings or one thing in them.
pub const LOOK: &str = "look";
/// Skill name: move through a passage.
pub const GO: &str = "go";
/// Skill name: speak to everyone nearby.
pub const SAY: &str = "say";
/// Skill name: make a new object here.
pub const CREATE: &str = "create";

/// Key of the answer `go` expects from the passage's reaction.
pub const GO_DESTINATION: &str = "location_id";
/// Key of the parameter `say` passes to listeners.
pub const WORDS: &str = "words";

fn title(text: &str) -> Message {
    StyledText::new(text, Color::Yellow)
        .underline()
        .bold()
        .into()
}

/// All reference skills, in registration order.
pub fn all() -> Vec<Skill> {
    vec![
        Skill::new(LOOK, look)
            .with_synonyms(["l"])
            .with_description("Look around, or at something nearby."),
        Skill::new(CREATE, create).with_description("Make a new object where you stand."),
        Skill::new(GO, go).with_description("Go through an exit."),
        Skill::new(SAY, say).with_description("Say something to everyone nearby."),
    ]
}

/// `look [THING]`
pub fn look(
    engine: &mut Engine,
    tokens: &[String],
    skill: SkillId,
    caller: &EntityId,
) -> EngineResult<()> {
    let Some(location) = location_of(engine, caller) else {
        engine.send_to(caller, "You are nowhere.");
        return Ok(());
    };
    let place = engine.react_to(caller, skill, &location, &Mapping::new())?;
    let seen = visible_to(engine, caller)?;

    if let Some(wanted) = tokens.get(1) {
        if let Some(thing) = seen.iter().find(|s| answers_to(s, wanted)) {
            engine.send_to(caller, title(answer_str(thing, NAME).unwrap_or_default()));
            engine.send_to(caller, answer_str(thing, DESCRIPTION).unwrap_or_default());
            return Ok(());
        }
    }

    let names = seen
        .iter()
        .filter_map(|s| answer_str(s, NAME))
        .collect::<Vec<_>>()
        .join(", ");
    let sight = if names.is_empty() {
        "You see nothing here.".to_string()
    } else {
        format!("You can see {names} here.")
    };

    match place {
        Some(place) => {
            let description = answer_str(&place, DESCRIPTION).unwrap_or_default();
            let line = format!("{description} {sight}");
            engine.send_to(caller, title(answer_str(&place, NAME).unwrap_or_default()));
            engine.send_to(caller, line.trim_start());
        }
        None => engine.send_to(caller, sight),
    }
    Ok(())
}

/// `go EXIT`
pub fn go(
    engine: &mut Engine,
    tokens: &[String],
    skill: SkillId,
    caller: &EntityId,
) -> EngineResult<()> {
    let Some(exit) = tokens.get(1) else {
        engine.send_to(caller, "go EXIT");
        return Ok(());
    };
    let Some(target) = find_target(engine, caller, exit)? else {
        engine.send_to(caller, "You can't see that.");
        return Ok(());
    };
    let Some(target) = answer_str(&target, "id").map(EntityId::from) else {
        engine.send_to(caller, "You can't see that.");
        return Ok(());
    };

    let destination = engine
        .react_to(caller, skill, &target, &Mapping::new())?
        .and_then(|answer| answer_str(&answer, GO_DESTINATION).map(str::to_string));
    let Some(destination) = destination else {
        engine.send_to(caller, "You can't go there.");
        return Ok(());
    };

    engine
        .entity_mut(caller)?
        .set(LOCATION, destination.as_str());
    engine.use_skill(LOOK, caller)
}

/// `say WORDS...`
pub fn say(
    engine: &mut Engine,
    tokens: &[String],
    skill: SkillId,
    caller: &EntityId,
) -> EngineResult<()> {
    if tokens.len() < 2 {
        engine.send_to(caller, "say WORDS");
        return Ok(());
    }
    let Some(location) = location_of(engine, caller) else {
        return Ok(());
    };

    let mut params = Mapping::new();
    params.insert(WORDS.to_string(), Value::from(tokens[1..].join(" ")));
    for listener in in_location(engine, &location) {
        engine.react_to(caller, skill, &listener, &params)?;
    }
    Ok(())
}

/// `create NAME DESCRIPTION`
pub fn create(
    engine: &mut Engine,
    tokens: &[String],
    _skill: SkillId,
    caller: &EntityId,
) -> EngineResult<()> {
    let [_, name, description, ..] = tokens else {
        engine.send_to(caller, "create NAME DESCRIPTION");
        return Ok(());
    };
    let location = location_of(engine, caller);
    let id = create_object(engine, name, description, location.as_ref())?;

    // Anything created can at least be looked at.
    if let Some(&visible) = engine.catalog().reaction_ids_for_skill_name(LOOK).first() {
        engine.entity_mut(&id)?.reactions.insert(visible);
    }
    engine.send_to(caller, format!("You create {name}."));
    Ok(())
}
