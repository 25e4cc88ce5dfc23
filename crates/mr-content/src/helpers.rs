use mr_core::{Entity, EntityId, Mapping, Value};
use mr_engine::{Engine, EngineError, EngineResult};

use crate::skills::LOOK;

/// State key holding the ID of the entity something is in.
pub const LOCATION: &str = "location";
/// State key holding a display name.
pub const NAME: &str = "name";
/// State key holding a description.
pub const DESCRIPTION: &str = "description";
/// State key holding alternate names (a list of strings).
pub const SYNONYMS: &str = "synonyms";
/// State key holding where a passage leads.
pub const DESTINATION: &str = "destination";

/// Add a named, described object with a generated ID.
pub fn create_object(
    engine: &mut Engine,
    name: &str,
    description: &str,
    location: Option<&EntityId>,
) -> EngineResult<EntityId> {
    create_object_with_id(engine, EntityId::new(), name, description, location)
}

/// Add a named, described object with a chosen ID.
pub fn create_object_with_id(
    engine: &mut Engine,
    id: impl Into<EntityId>,
    name: &str,
    description: &str,
    location: Option<&EntityId>,
) -> EngineResult<EntityId> {
    let mut entity = Entity::with_id(id)
        .with_state(NAME, name)
        .with_state(DESCRIPTION, description);
    if let Some(location) = location {
        entity.set(LOCATION, location.as_str());
    }
    engine.add(entity)
}

/// Where an entity is, if it is anywhere that still exists.
pub fn location_of(engine: &Engine, id: &EntityId) -> Option<EntityId> {
    let location = EntityId::from(engine.get(id)?.get_str(LOCATION)?);
    engine.get(&location).map(|_| location)
}

/// IDs of every entity located in `location`, in insertion order.
pub fn in_location(engine: &Engine, location: &EntityId) -> Vec<EntityId> {
    engine.query_by_state(LOCATION, |v| v.as_str() == Some(location.as_str()))
}

/// What `caller` sees around it: the `look` answers of everything sharing
/// its location. Entities that do not answer `look` are left out.
pub fn visible_to(engine: &mut Engine, caller: &EntityId) -> EngineResult<Vec<Mapping>> {
    let look = engine
        .skill_id(LOOK)
        .ok_or_else(|| EngineError::UnknownSkill(LOOK.to_string()))?;
    let Some(location) = location_of(engine, caller) else {
        return Ok(Vec::new());
    };

    let mut seen = Vec::new();
    for id in in_location(engine, &location) {
        if let Some(answer) = engine.react_to(caller, look, &id, &Mapping::new())? {
            seen.push(answer);
        }
    }
    Ok(seen)
}

/// Whether a `look` answer goes by `name`, through its name or a synonym.
pub fn answers_to(seen: &Mapping, name: &str) -> bool {
    let by_name = seen
        .get(NAME)
        .and_then(Value::as_str)
        .is_some_and(|n| n.eq_ignore_ascii_case(name));
    let by_synonym = seen
        .get(SYNONYMS)
        .and_then(Value::as_list)
        .is_some_and(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .any(|s| s.eq_ignore_ascii_case(name))
        });
    by_name || by_synonym
}

/// The first thing `caller` can see that goes by `name`.
pub fn find_target(
    engine: &mut Engine,
    caller: &EntityId,
    name: &str,
) -> EngineResult<Option<Mapping>> {
    Ok(visible_to(engine, caller)?
        .into_iter()
        .find(|seen| answers_to(seen, name)))
}

/// Read a string out of a reaction answer.
pub fn answer_str<'a>(answer: &'a Mapping, key: &str) -> Option<&'a str> {
    answer.get(key).and_then(Value::as_str)
}
