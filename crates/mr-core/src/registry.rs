use std::collections::HashMap;

use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::value::Value;

/// The object registry. Owns every live entity, keyed by ID.
///
/// Iteration and query results follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<EntityId, Entity>,

    // Index
    order: Vec<EntityId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Entity CRUD
    // -----------------------------------------------------------------------

    /// Add an entity. Returns its ID, or `DuplicateId` if one with the same ID
    /// is already registered (the registry is left unchanged).
    pub fn add(&mut self, entity: Entity) -> CoreResult<EntityId> {
        if self.entities.contains_key(&entity.id) {
            return Err(CoreError::DuplicateId(entity.id));
        }
        let id = entity.id.clone();
        self.order.push(id.clone());
        self.entities.insert(id.clone(), entity);
        Ok(id)
    }

    /// Remove an entity, handing it back to the caller.
    pub fn remove(&mut self, id: &EntityId) -> CoreResult<Entity> {
        let entity = self
            .entities
            .remove(id)
            .ok_or_else(|| CoreError::EntityNotFound(id.clone()))?;
        self.order.retain(|eid| eid != id);
        Ok(entity)
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Check whether an entity is registered.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every entity whose `state[key]` exists and satisfies `predicate`,
    /// in insertion order.
    pub fn query_by_state(&self, key: &str, predicate: impl Fn(&Value) -> bool) -> Vec<&Entity> {
        self.iter()
            .filter(|e| e.state.get(key).is_some_and(&predicate))
            .collect()
    }

    /// Like [`Registry::query_by_state`], but returns owned IDs so callers can
    /// go on to mutate the registry.
    pub fn query_ids_by_state(
        &self,
        key: &str,
        predicate: impl Fn(&Value) -> bool,
    ) -> Vec<EntityId> {
        self.query_by_state(key, predicate)
            .into_iter()
            .map(|e| e.id.clone())
            .collect()
    }

    /// All entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// All entity IDs in insertion order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
