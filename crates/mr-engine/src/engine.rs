use mr_core::{CoreError, Entity, EntityId, Message, ReactionId, Registry, SkillId, Value};
use tracing::{trace, warn};

use crate::catalog::{Catalog, Reaction, Script, Skill};
use crate::clock::SimClock;
use crate::config::EngineConfig;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticLog};
use crate::error::{EngineError, EngineResult};
use crate::event::{EventBus, EventPayload, ListenerBinding, TICK_EVENT};
use crate::outbox::{Delivery, OutputSink, Outbox};

/// The world context handed to every skill, reaction, and script.
///
/// Owns the registry, catalogs, event bindings, clock, output sink, and
/// diagnostics. Several engines can coexist; nothing is global.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) registry: Registry,
    pub(crate) catalog: Catalog,
    pub(crate) events: EventBus,
    clock: SimClock,
    outbox: Outbox,
    diagnostics: DiagnosticLog,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("tick", &self.clock.tick())
            .field("entities", &self.registry.len())
            .field("skills", &self.catalog.skill_count())
            .field("bindings", &self.events.len())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an empty engine.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_catalog(config, Catalog::new())
    }

    /// Create an engine around an already-populated catalog.
    pub fn with_catalog(config: EngineConfig, catalog: Catalog) -> Self {
        let clock = SimClock::new(config.tick_seconds);
        let diagnostics = DiagnosticLog::new(config.max_diagnostics);
        Self {
            config,
            registry: Registry::new(),
            catalog,
            events: EventBus::new(),
            clock,
            outbox: Outbox::new(),
            diagnostics,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// The object registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the object registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Add an entity. Rejects an ID that is already live.
    pub fn add(&mut self, entity: Entity) -> EngineResult<EntityId> {
        Ok(self.registry.add(entity)?)
    }

    /// Remove an entity. Its event bindings are left in place.
    pub fn remove(&mut self, id: &EntityId) -> EngineResult<Entity> {
        Ok(self.registry.remove(id)?)
    }

    /// Look up an entity.
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    /// Look up an entity mutably.
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(id)
    }

    /// Like [`Engine::get`], but a missing entity is an error.
    pub fn entity(&self, id: &EntityId) -> EngineResult<&Entity> {
        self.registry
            .get(id)
            .ok_or_else(|| CoreError::EntityNotFound(id.clone()).into())
    }

    /// Like [`Engine::get_mut`], but a missing entity is an error.
    pub fn entity_mut(&mut self, id: &EntityId) -> EngineResult<&mut Entity> {
        self.registry
            .get_mut(id)
            .ok_or_else(|| CoreError::EntityNotFound(id.clone()).into())
    }

    /// IDs of every entity whose `state[key]` exists and satisfies `predicate`,
    /// in insertion order.
    pub fn query_by_state(&self, key: &str, predicate: impl Fn(&Value) -> bool) -> Vec<EntityId> {
        self.registry.query_ids_by_state(key, predicate)
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// The skill, reaction, and script catalogs.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a skill. A keyword that already pointed at another skill is
    /// taken over and the takeover is recorded as a diagnostic.
    pub fn add_skill(&mut self, skill: Skill) -> SkillId {
        let current = skill.id;
        let shadowed: Vec<(String, SkillId)> = skill
            .keywords()
            .filter_map(|keyword| {
                self.catalog
                    .skill_id(&keyword)
                    .filter(|previous| *previous != current)
                    .map(|previous| (keyword, previous))
            })
            .collect();

        for (keyword, previous) in shadowed {
            warn!(%keyword, %previous, %current, "skill keyword shadowed");
            let description = format!("keyword \"{keyword}\" now resolves to skill {current}");
            self.record(
                DiagnosticKind::SkillShadowed {
                    keyword,
                    previous,
                    current,
                },
                description,
            );
        }
        self.catalog.add_skill(skill)
    }

    /// Register a reaction. Its skill must already be registered.
    pub fn add_reaction(&mut self, reaction: Reaction) -> EngineResult<ReactionId> {
        self.catalog.add_reaction(reaction)
    }

    /// Register a script.
    pub fn add_script(&mut self, script: Script) {
        self.catalog.add_script(script);
    }

    /// Resolve a skill name or synonym.
    pub fn skill_id(&self, name: &str) -> Option<SkillId> {
        self.catalog.skill_id(name)
    }

    // -----------------------------------------------------------------------
    // Imbuing
    // -----------------------------------------------------------------------

    /// Entitle an entity to the skill with this name or synonym.
    pub fn imbue_skill(&mut self, id: &EntityId, name: &str) -> EngineResult<()> {
        let skill = self
            .catalog
            .skill_id(name)
            .ok_or_else(|| EngineError::UnknownSkill(name.to_string()))?;
        self.entity_mut(id)?.skills.insert(skill);
        Ok(())
    }

    /// Entitle an entity to several skills. Stops at the first unknown name.
    pub fn imbue_skills<I, S>(&mut self, id: &EntityId, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.imbue_skill(id, name.as_ref())?;
        }
        Ok(())
    }

    /// Give an entity the first reaction registered under this name.
    pub fn imbue_reaction(&mut self, id: &EntityId, name: &str) -> EngineResult<()> {
        let reaction = self
            .catalog
            .reaction_id(name)
            .ok_or_else(|| EngineError::UnknownReaction(name.to_string()))?;
        self.entity_mut(id)?.reactions.insert(reaction);
        Ok(())
    }

    /// Give an entity several reactions. Stops at the first unknown name.
    pub fn imbue_reactions<I, S>(&mut self, id: &EntityId, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.imbue_reaction(id, name.as_ref())?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// The sink handlers write to.
    pub fn output(&mut self) -> &mut dyn OutputSink {
        &mut self.outbox
    }

    /// Shorthand for `output().send_to(..)`.
    pub fn send_to(&mut self, entity: &EntityId, message: impl Into<Message>) {
        self.outbox.send_to(entity, message.into());
    }

    /// Shorthand for `output().broadcast(..)`.
    pub fn broadcast(&mut self, message: impl Into<Message>) {
        self.outbox.broadcast(message.into());
    }

    /// The outbox.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Host access to the client association table.
    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Take every queued delivery.
    pub fn drain_output(&mut self) -> Vec<Delivery> {
        self.outbox.drain()
    }

    // -----------------------------------------------------------------------
    // Diagnostics and time
    // -----------------------------------------------------------------------

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub(crate) fn record(&mut self, kind: DiagnosticKind, description: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(self.clock.tick(), kind, description));
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Accumulated simulated seconds.
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Bind `script` to run on behalf of `listener` whenever `event` fires.
    /// The script is resolved by name only when the event fires.
    pub fn register_event(
        &mut self,
        event: impl Into<String>,
        listener: impl Into<EntityId>,
        script: impl Into<String>,
    ) {
        self.events
            .register(event, ListenerBinding::new(listener, script));
    }

    /// Remove the bindings of `script` for `listener` on `event`.
    pub fn unregister_event(&mut self, event: &str, listener: &EntityId, script: &str) -> usize {
        self.events.unregister(event, listener, script)
    }

    /// Remove every binding held by `listener`.
    pub fn unregister_listener(&mut self, listener: &EntityId) -> usize {
        self.events.unregister_listener(listener)
    }

    /// Current event bindings.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Run every script bound to `event`, in registration order.
    ///
    /// Bindings are read before the first script runs, so scripts that
    /// register or unregister bindings affect the next firing only.
    pub fn call_event(&mut self, event: &str, payload: &EventPayload) -> EngineResult<()> {
        let bindings = self.events.bindings(event).to_vec();
        trace!(event, bindings = bindings.len(), "firing event");
        for binding in bindings {
            let handler = self
                .catalog
                .script(&binding.script)
                .ok_or_else(|| EngineError::UnknownScript(binding.script.clone()))?
                .handler();
            handler.run(self, &binding.listener, payload)?;
        }
        Ok(())
    }

    /// Advance simulated time by one step and fire the tick event.
    /// Returns the new accumulated time.
    pub fn tick(&mut self) -> EngineResult<f64> {
        let time = self.clock.advance();
        self.call_event(TICK_EVENT, &EventPayload::Tick { time })?;
        Ok(time)
    }

    /// Advance by `n` ticks.
    pub fn run(&mut self, n: u64) -> EngineResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mr_core::Mapping;

    use super::*;

    fn noop_skill(name: &str) -> Skill {
        Skill::new(name, |_: &mut Engine, _: &[String], _: SkillId, _: &EntityId| Ok(()))
    }

    fn counting_script(name: &str, seen: Arc<Mutex<Vec<(EntityId, Option<f64>)>>>) -> Script {
        Script::new(
            name,
            move |_: &mut Engine, listener: &EntityId, payload: &EventPayload| {
                seen.lock().unwrap().push((listener.clone(), payload.time()));
                Ok(())
            },
        )
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut engine = Engine::default();
        engine.add(Entity::with_id("room")).unwrap();
        let result = engine.add(Entity::with_id("room"));
        assert!(matches!(
            result,
            Err(EngineError::Core(CoreError::DuplicateId(_)))
        ));
        assert_eq!(engine.registry().len(), 1);
    }

    #[test]
    fn shadowed_keyword_is_recorded() {
        let mut engine = Engine::default();
        engine.add_skill(noop_skill("look").with_synonyms(["l"]));
        let newer = engine.add_skill(noop_skill("list").with_synonyms(["l"]));
        assert_eq!(engine.skill_id("l"), Some(newer));
        assert_eq!(engine.diagnostics().len(), 1);
        assert!(matches!(
            &engine.diagnostics().entries()[0].kind,
            DiagnosticKind::SkillShadowed { keyword, .. } if keyword == "l"
        ));
    }

    #[test]
    fn imbue_by_name() {
        let mut engine = Engine::default();
        let look = engine.add_skill(noop_skill("look"));
        engine
            .add_reaction(Reaction::new(
                "look_visible",
                "look",
                |_: &mut Engine, _: &EntityId, _: &EntityId, _: &Mapping| Ok(None),
            ))
            .unwrap();
        let hero = engine.add(Entity::with_id("hero")).unwrap();

        engine.imbue_skills(&hero, ["LOOK"]).unwrap();
        engine.imbue_reactions(&hero, ["look_visible"]).unwrap();
        let entity = engine.get(&hero).unwrap();
        assert!(entity.skills.contains(look));
        assert_eq!(entity.reactions.len(), 1);

        assert!(matches!(
            engine.imbue_skill(&hero, "dance"),
            Err(EngineError::UnknownSkill(_))
        ));
        assert!(matches!(
            engine.imbue_reaction(&hero, "dance_back"),
            Err(EngineError::UnknownReaction(_))
        ));
        assert!(matches!(
            engine.imbue_skill(&"ghost".into(), "look"),
            Err(EngineError::Core(CoreError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn tick_fires_bound_scripts_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::new(EngineConfig::default().with_tick_seconds(0.5));
        engine.add_script(counting_script("count", Arc::clone(&seen)));
        engine.register_event(TICK_EVENT, "b", "count");
        engine.register_event(TICK_EVENT, "a", "count");

        assert_eq!(engine.tick().unwrap(), 0.5);
        engine.tick().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (EntityId::from("b"), Some(0.5)),
                (EntityId::from("a"), Some(0.5)),
                (EntityId::from("b"), Some(1.0)),
                (EntityId::from("a"), Some(1.0)),
            ]
        );
        assert_eq!(engine.clock().tick(), 2);
    }

    #[test]
    fn custom_events_carry_their_data() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::default();
        engine.add_script(counting_script("count", Arc::clone(&seen)));
        engine.register_event("dawn", "rooster", "count");

        engine
            .call_event(
                "dawn",
                &EventPayload::Custom {
                    data: Mapping::new(),
                },
            )
            .unwrap();
        engine.tick().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(EntityId::from("rooster"), None)]);
    }

    #[test]
    fn missing_script_is_fatal() {
        let mut engine = Engine::default();
        engine.register_event(TICK_EVENT, "shouter", "shout");
        assert!(matches!(
            engine.tick(),
            Err(EngineError::UnknownScript(name)) if name == "shout"
        ));
    }

    #[test]
    fn unregister_stops_firing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::default();
        engine.add_script(counting_script("count", Arc::clone(&seen)));
        engine.register_event(TICK_EVENT, "a", "count");
        assert_eq!(engine.unregister_event(TICK_EVENT, &"a".into(), "count"), 1);
        engine.run(3).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn output_goes_through_outbox() {
        let mut engine = Engine::default();
        engine.outbox_mut().associate("hero".into(), "local");
        engine.send_to(&"hero".into(), "hi");
        engine.output().send_to(&"nobody".into(), "lost".into());
        engine.broadcast("all");
        let texts: Vec<String> = engine
            .drain_output()
            .into_iter()
            .map(|d| d.message.plain_text())
            .collect();
        assert_eq!(texts, vec!["hi", "all"]);
    }
}
