use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::{CapabilitySet, ReactionId, SkillId};
use crate::value::{Mapping, Value};

/// Unique identifier for every entity in the world.
///
/// Usually a random UUID string, but callers may pick their own (for example
/// `"town-square"`) so well-known landmarks have predictable IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Core entity struct. Rooms, items, and avatars are all entities.
///
/// An entity is a bag of state plus two capability sets: the skills it may
/// invoke and the reactions it can respond with when targeted.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Unique identifier for this entity. Never changes once registered.
    pub id: EntityId,
    /// Arbitrary key-value state, owned by content code.
    pub state: Mapping,
    /// Skills this entity is entitled to invoke.
    pub skills: CapabilitySet<SkillId>,
    /// Reactions this entity can respond with.
    pub reactions: CapabilitySet<ReactionId>,
}

impl Entity {
    /// Create a new entity with a random ID.
    pub fn new() -> Self {
        Self::with_id(EntityId::new())
    }

    /// Create an entity with a pre-assigned ID.
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            state: Mapping::new(),
            skills: CapabilitySet::new(),
            reactions: CapabilitySet::new(),
        }
    }

    /// Builder-style state assignment.
    pub fn with_state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// Look up a state value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Look up a state value as text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.state.get(key).and_then(Value::as_str)
    }

    /// Set a state value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.state.insert(key.into(), value.into())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn with_id_preserves_given_id() {
        let entity = Entity::with_id("town-square");
        assert_eq!(entity.id.as_str(), "town-square");
        assert!(entity.state.is_empty());
        assert!(entity.skills.is_empty());
    }

    #[test]
    fn state_accessors() {
        let mut entity = Entity::new().with_state("name", "Box");
        assert_eq!(entity.get_str("name"), Some("Box"));
        let old = entity.set("name", "Crate");
        assert_eq!(old, Some(Value::from("Box")));
        assert_eq!(entity.get_str("missing"), None);
    }

    #[test]
    fn entity_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&EntityId::from("hero")).unwrap();
        assert_eq!(json, "\"hero\"");
    }
}
