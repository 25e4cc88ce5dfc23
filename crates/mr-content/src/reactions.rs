use mr_core::{Color, EntityId, Mapping, Message, StyledText, Value};
use mr_engine::{Engine, EngineResult, Reaction};

use crate::helpers::{DESCRIPTION, DESTINATION, NAME, SYNONYMS};
use crate::skills::{GO, GO_DESTINATION, LOOK, SAY, WORDS};

/// Reaction name: answers `look` with the holder's name and description.
pub const LOOK_VISIBLE: &str = "look_visible";
/// Reaction name: answers `go` with the holder's destination.
pub const GO_CAN_GO: &str = "go_can_go";
/// Reaction name: answers `say` by showing the words to the holder.
pub const LISTEN_CAN_HEAR: &str = "listen_can_hear";

/// All reference reactions, in registration order. Their skills must be
/// registered first.
pub fn all() -> Vec<Reaction> {
    vec![
        Reaction::new(LOOK_VISIBLE, LOOK, look_visible),
        Reaction::new(LISTEN_CAN_HEAR, SAY, listen_can_hear),
        Reaction::new(GO_CAN_GO, GO, go_can_go),
    ]
}

/// Describe the holder: `id`, plus `name`, `description`, and `synonyms`
/// when it has them.
pub fn look_visible(
    engine: &mut Engine,
    _looker: &EntityId,
    this: &EntityId,
    _params: &Mapping,
) -> EngineResult<Option<Mapping>> {
    let entity = engine.entity(this)?;
    let mut answer = Mapping::new();
    answer.insert("id".to_string(), Value::from(this.as_str()));
    for key in [NAME, DESCRIPTION, SYNONYMS] {
        if let Some(value) = entity.get(key) {
            answer.insert(key.to_string(), value.clone());
        }
    }
    Ok(Some(answer))
}

/// Show the speaker's words to the holder.
pub fn listen_can_hear(
    engine: &mut Engine,
    speaker: &EntityId,
    this: &EntityId,
    params: &Mapping,
) -> EngineResult<Option<Mapping>> {
    let name = engine
        .get(speaker)
        .and_then(|e| e.get_str(NAME))
        .unwrap_or("Someone")
        .to_string();
    let words = params
        .get(WORDS)
        .map(Value::to_string)
        .unwrap_or_default();
    engine.send_to(
        this,
        Message::List(vec![
            StyledText::new(format!("{name}: "), Color::Yellow).into(),
            Message::from(words),
        ]),
    );
    Ok(Some(Mapping::new()))
}

/// Let the holder be walked through. No destination means no answer.
pub fn go_can_go(
    engine: &mut Engine,
    _walker: &EntityId,
    this: &EntityId,
    _params: &Mapping,
) -> EngineResult<Option<Mapping>> {
    let Some(destination) = engine.entity(this)?.get(DESTINATION) else {
        return Ok(None);
    };
    let mut answer = Mapping::new();
    answer.insert(GO_DESTINATION.to_string(), destination.clone());
    Ok(Some(answer))
}
