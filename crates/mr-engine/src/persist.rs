//! Snapshot codec: the world to and from [`Snapshot`].
//!
//! Capabilities and scripts travel by name. Loading resolves every name
//! against the catalog, which must already hold the same content it held
//! when the snapshot was taken.

use std::collections::{BTreeMap, HashSet};

use mr_core::{CoreError, Entity, EntityId, ListenerRecord, ObjectRecord, Snapshot};
use tracing::debug;

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::event::ListenerBinding;

impl Engine {
    /// Serialize one entity, resolving its capability IDs to names.
    ///
    /// Fails with [`EngineError::NonFiniteState`] if any state value holds
    /// a NaN or infinite float.
    pub fn export_entity(&self, id: &EntityId) -> EngineResult<ObjectRecord> {
        let entity = self.entity(id)?;
        if let Some((key, _)) = entity.state.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFiniteState {
                id: entity.id.clone(),
                key: key.clone(),
            });
        }
        let skills = entity
            .skills
            .iter()
            .map(|skill| {
                self.catalog
                    .skill(skill)
                    .map(|s| s.name.clone())
                    .ok_or(EngineError::SkillNotFound(skill))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        let reactions = entity
            .reactions
            .iter()
            .map(|reaction| {
                self.catalog
                    .reaction(reaction)
                    .map(|r| r.name.clone())
                    .ok_or(EngineError::ReactionNotFound(reaction))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(ObjectRecord {
            id: entity.id.clone(),
            state: entity.state.clone(),
            reactions,
            skills,
        })
    }

    /// Serialize every live entity and every event binding.
    pub fn dump_state(&self) -> EngineResult<Snapshot> {
        let objects = self
            .registry
            .ids()
            .iter()
            .map(|id| self.export_entity(id))
            .collect::<EngineResult<Vec<_>>>()?;

        let listeners: BTreeMap<String, Vec<ListenerRecord>> = self
            .events
            .iter()
            .map(|(event, bindings)| {
                (
                    event.to_string(),
                    bindings.iter().map(ListenerRecord::from).collect(),
                )
            })
            .collect();

        Ok(Snapshot { objects, listeners })
    }

    /// Rebuild an entity from a record without adding it.
    fn entity_from_record(&self, record: &ObjectRecord) -> EngineResult<Entity> {
        let mut entity = Entity::with_id(record.id.clone());
        entity.state = record.state.clone();
        for name in &record.skills {
            let skill = self
                .catalog
                .skill_id(name)
                .ok_or_else(|| EngineError::UnknownSkill(name.clone()))?;
            entity.skills.insert(skill);
        }
        for name in &record.reactions {
            let reaction = self
                .catalog
                .reaction_id(name)
                .ok_or_else(|| EngineError::UnknownReaction(name.clone()))?;
            entity.reactions.insert(reaction);
        }
        Ok(entity)
    }

    /// Add one entity from a record. Fails without side effects if the ID is
    /// taken or a capability name is unknown.
    pub fn import_entity(&mut self, record: &ObjectRecord) -> EngineResult<EntityId> {
        if self.registry.contains(&record.id) {
            return Err(CoreError::DuplicateId(record.id.clone()).into());
        }
        let entity = self.entity_from_record(record)?;
        self.add(entity)
    }

    /// Restore a snapshot into this engine.
    ///
    /// Every record and binding is validated before anything is added, so on
    /// error the engine is unchanged. Entities already present are kept; an
    /// ID clash is [`CoreError::DuplicateId`]. The clock is not restored.
    pub fn load_state(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
        let mut seen = HashSet::new();
        let mut entities = Vec::with_capacity(snapshot.objects.len());
        for record in &snapshot.objects {
            if self.registry.contains(&record.id) || !seen.insert(&record.id) {
                return Err(CoreError::DuplicateId(record.id.clone()).into());
            }
            entities.push(self.entity_from_record(record)?);
        }
        for record in snapshot.listeners.values().flatten() {
            if self.catalog.script(&record.script).is_none() {
                return Err(EngineError::UnknownScript(record.script.clone()));
            }
        }

        for entity in entities {
            self.registry.add(entity)?;
        }
        for (event, records) in &snapshot.listeners {
            for record in records {
                self.events
                    .register(event.clone(), ListenerBinding::from(record.clone()));
            }
        }
        debug!(
            objects = snapshot.objects.len(),
            bindings = self.events.len(),
            "snapshot loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mr_core::{Mapping, SkillId, Value};
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::{Catalog, Reaction, Script, Skill};
    use crate::config::EngineConfig;
    use crate::event::{EventPayload, TICK_EVENT};

    const SKILLS: [&str; 3] = ["look", "go", "say"];
    const REACTIONS: [(&str, &str); 3] = [
        ("look_visible", "look"),
        ("go_can_go", "go"),
        ("listen_can_hear", "say"),
    ];
    const SCRIPTS: [&str; 2] = ["shout", "wander"];

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for name in SKILLS {
            catalog.add_skill(Skill::new(
                name,
                |_: &mut Engine, _: &[String], _: SkillId, _: &EntityId| Ok(()),
            ));
        }
        for (name, skill) in REACTIONS {
            catalog
                .add_reaction(Reaction::new(
                    name,
                    skill,
                    |_: &mut Engine, _: &EntityId, _: &EntityId, _: &Mapping| Ok(None),
                ))
                .unwrap();
        }
        for name in SCRIPTS {
            catalog.add_script(Script::new(
                name,
                |_: &mut Engine, _: &EntityId, _: &EventPayload| Ok(()),
            ));
        }
        catalog
    }

    fn engine() -> Engine {
        Engine::with_catalog(EngineConfig::default(), catalog())
    }

    fn populated() -> Engine {
        let mut engine = engine();
        let room = engine
            .add(Entity::with_id("room").with_state("name", "A room"))
            .unwrap();
        let hero = engine
            .add(
                Entity::with_id("hero")
                    .with_state("name", "Hero")
                    .with_state("location", "room"),
            )
            .unwrap();
        engine.imbue_reaction(&room, "look_visible").unwrap();
        engine.imbue_skills(&hero, ["look", "go"]).unwrap();
        engine
            .imbue_reactions(&hero, ["look_visible", "listen_can_hear"])
            .unwrap();
        engine.register_event(TICK_EVENT, "hero", "wander");
        engine
    }

    #[test]
    fn dump_resolves_names() {
        let snapshot = populated().dump_state().unwrap();
        assert_eq!(snapshot.objects.len(), 2);
        let hero = &snapshot.objects[1];
        assert_eq!(hero.id.as_str(), "hero");
        assert_eq!(hero.skills, vec!["look", "go"]);
        assert_eq!(hero.reactions, vec!["look_visible", "listen_can_hear"]);
        assert_eq!(snapshot.listeners[TICK_EVENT].len(), 1);
    }

    #[test]
    fn round_trip_through_json() {
        let source = populated();
        let json = source.dump_state().unwrap().to_json().unwrap();

        let mut restored = engine();
        restored
            .load_state(&Snapshot::from_json(&json).unwrap())
            .unwrap();
        assert_eq!(
            restored.dump_state().unwrap(),
            source.dump_state().unwrap()
        );
        // IDs are rebound against the new catalog.
        let look = restored.skill_id("look").unwrap();
        assert!(restored.get(&"hero".into()).unwrap().skills.contains(look));
    }

    #[test]
    fn restored_bindings_fire() {
        let snapshot = populated().dump_state().unwrap();
        let mut restored = engine();
        restored.load_state(&snapshot).unwrap();
        assert_eq!(restored.events().bindings(TICK_EVENT).len(), 1);
        restored.tick().unwrap();
    }

    #[test]
    fn unknown_names_leave_engine_untouched() {
        let mut snapshot = populated().dump_state().unwrap();
        snapshot.objects[1].skills.push("fly".into());
        let mut restored = engine();
        assert!(matches!(
            restored.load_state(&snapshot),
            Err(EngineError::UnknownSkill(name)) if name == "fly"
        ));
        assert!(restored.registry().is_empty());

        let mut snapshot = populated().dump_state().unwrap();
        snapshot
            .listeners
            .entry(TICK_EVENT.to_string())
            .or_default()
            .push(ListenerRecord {
                listener: "hero".into(),
                script: "sing".into(),
            });
        assert!(matches!(
            restored.load_state(&snapshot),
            Err(EngineError::UnknownScript(name)) if name == "sing"
        ));
        assert!(restored.registry().is_empty());
        assert!(restored.events().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let snapshot = populated().dump_state().unwrap();
        let mut restored = populated();
        assert!(matches!(
            restored.load_state(&snapshot),
            Err(EngineError::Core(CoreError::DuplicateId(_)))
        ));
        assert_eq!(restored.registry().len(), 2);
    }

    #[test]
    fn export_then_import_single_entity() {
        let mut source = populated();
        let record = source.export_entity(&"hero".into()).unwrap();
        assert!(matches!(
            source.import_entity(&record),
            Err(EngineError::Core(CoreError::DuplicateId(_)))
        ));
        source.remove(&"hero".into()).unwrap();
        source.import_entity(&record).unwrap();
        assert_eq!(source.export_entity(&"hero".into()).unwrap(), record);
        assert!(matches!(
            source.export_entity(&"nobody".into()),
            Err(EngineError::Core(CoreError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn non_finite_state_is_refused() {
        let mut engine = populated();
        engine
            .add(Entity::with_id("gauge").with_state("level", f64::NAN))
            .unwrap();
        assert!(matches!(
            engine.dump_state(),
            Err(EngineError::NonFiniteState { id, key }) if id.as_str() == "gauge" && key == "level"
        ));

        let nested = Value::List(vec![Value::Float(f64::INFINITY)]);
        engine
            .add(Entity::with_id("drum").with_state("beats", nested))
            .unwrap();
        assert!(matches!(
            engine.export_entity(&"drum".into()),
            Err(EngineError::NonFiniteState { key, .. }) if key == "beats"
        ));
        assert!(engine.export_entity(&"hero".into()).is_ok());
    }

    fn value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(Value::Boolean),
            any::<i64>().prop_map(Value::Integer),
            // Quarter steps survive a JSON round trip exactly.
            (-1000i32..1000).prop_map(|n| Value::Float(f64::from(n) / 4.0 + 0.25)),
            "[a-z ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 12, 3, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
                proptest::collection::btree_map("[a-z]{1,4}", inner, 0..3).prop_map(Value::Map),
            ]
        })
    }

    #[derive(Debug, Clone)]
    struct ObjectSpec {
        state: Mapping,
        skills: Vec<usize>,
        reactions: Vec<usize>,
    }

    fn object() -> impl Strategy<Value = ObjectSpec> {
        (
            proptest::collection::btree_map("[a-z]{1,6}", value(), 0..4),
            proptest::collection::vec(0..SKILLS.len(), 0..4),
            proptest::collection::vec(0..REACTIONS.len(), 0..4),
        )
            .prop_map(|(state, skills, reactions)| ObjectSpec {
                state,
                skills,
                reactions,
            })
    }

    proptest! {
        #[test]
        fn load_of_dump_reproduces_world(
            objects in proptest::collection::vec(object(), 0..6),
            bindings in proptest::collection::vec((0..6usize, 0..SCRIPTS.len(), prop::bool::ANY), 0..6),
        ) {
            let mut world = engine();
            let mut ids = Vec::new();
            for (i, spec) in objects.iter().enumerate() {
                let mut entity = Entity::with_id(format!("obj-{i}"));
                entity.state = spec.state.clone();
                let id = world.add(entity).unwrap();
                for &s in &spec.skills {
                    world.imbue_skill(&id, SKILLS[s]).unwrap();
                }
                for &r in &spec.reactions {
                    world.imbue_reaction(&id, REACTIONS[r].0).unwrap();
                }
                ids.push(id);
            }
            for (listener, script, on_tick) in bindings {
                let event = if on_tick { TICK_EVENT } else { "dawn" };
                world.register_event(event, format!("obj-{listener}"), SCRIPTS[script]);
            }

            let dumped = world.dump_state().unwrap();
            let json = dumped.to_json().unwrap();
            let mut restored = engine();
            restored.load_state(&Snapshot::from_json(&json).unwrap()).unwrap();

            prop_assert_eq!(restored.registry().ids(), world.registry().ids());
            for id in &ids {
                let before = world.get(id).unwrap();
                let after = restored.get(id).unwrap();
                prop_assert_eq!(&after.state, &before.state);
                prop_assert_eq!(after.skills.len(), before.skills.len());
                prop_assert_eq!(after.reactions.len(), before.reactions.len());
            }
            prop_assert_eq!(restored.dump_state().unwrap(), dumped);
        }
    }
}
