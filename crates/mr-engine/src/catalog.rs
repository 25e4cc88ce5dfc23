//! Static-content registries: skills, reactions, and scripts.
//!
//! Handlers are stored behind three small traits ([`Invocable`],
//! [`Respondable`], [`Scriptable`]). Plain closures and `fn` items with the
//! matching signature implement them automatically.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mr_core::{EntityId, Mapping, ReactionId, SkillId};
use tracing::debug;

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::event::EventPayload;

/// Handler behind a skill: runs when a player (or script) invokes the verb.
pub trait Invocable: Send + Sync {
    /// Invoke the skill. `tokens` is the full command, verb included.
    fn invoke(
        &self,
        engine: &mut Engine,
        tokens: &[String],
        skill: SkillId,
        caller: &EntityId,
    ) -> EngineResult<()>;
}

impl<F> Invocable for F
where
    F: Fn(&mut Engine, &[String], SkillId, &EntityId) -> EngineResult<()> + Send + Sync,
{
    fn invoke(
        &self,
        engine: &mut Engine,
        tokens: &[String],
        skill: SkillId,
        caller: &EntityId,
    ) -> EngineResult<()> {
        self(engine, tokens, skill, caller)
    }
}

/// Handler behind a reaction: answers a skill aimed at the entity holding it.
pub trait Respondable: Send + Sync {
    /// Respond to `actor` acting on `target`. `Ok(None)` means "no response".
    fn respond(
        &self,
        engine: &mut Engine,
        actor: &EntityId,
        target: &EntityId,
        params: &Mapping,
    ) -> EngineResult<Option<Mapping>>;
}

impl<F> Respondable for F
where
    F: Fn(&mut Engine, &EntityId, &EntityId, &Mapping) -> EngineResult<Option<Mapping>>
        + Send
        + Sync,
{
    fn respond(
        &self,
        engine: &mut Engine,
        actor: &EntityId,
        target: &EntityId,
        params: &Mapping,
    ) -> EngineResult<Option<Mapping>> {
        self(engine, actor, target, params)
    }
}

/// Handler behind a script: runs when an event the listener is bound to fires.
pub trait Scriptable: Send + Sync {
    /// Run the script on behalf of `listener`.
    fn run(
        &self,
        engine: &mut Engine,
        listener: &EntityId,
        payload: &EventPayload,
    ) -> EngineResult<()>;
}

impl<F> Scriptable for F
where
    F: Fn(&mut Engine, &EntityId, &EventPayload) -> EngineResult<()> + Send + Sync,
{
    fn run(
        &self,
        engine: &mut Engine,
        listener: &EntityId,
        payload: &EventPayload,
    ) -> EngineResult<()> {
        self(engine, listener, payload)
    }
}

/// A named, invocable verb.
#[derive(Clone)]
pub struct Skill {
    /// Generated identifier.
    pub id: SkillId,
    /// Primary keyword.
    pub name: String,
    /// Alternate keywords.
    pub synonyms: Vec<String>,
    /// Shown by the `skills` built-in.
    pub description: String,
    handler: Arc<dyn Invocable>,
}

impl Skill {
    /// Create a skill from a closure or function.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Engine, &[String], SkillId, &EntityId) -> EngineResult<()>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(name, Arc::new(handler))
    }

    /// Create a skill from any [`Invocable`].
    pub fn from_handler(name: impl Into<String>, handler: Arc<dyn Invocable>) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            synonyms: Vec::new(),
            description: "Some skill.".to_string(),
            handler,
        }
    }

    /// Set the alternate keywords.
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A shared handle to the handler.
    pub fn handler(&self) -> Arc<dyn Invocable> {
        Arc::clone(&self.handler)
    }

    /// Name and synonyms, lower-cased.
    pub fn keywords(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(&self.synonyms)
            .map(|k| k.to_lowercase())
    }
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("synonyms", &self.synonyms)
            .finish()
    }
}

/// A named capability answering one skill.
#[derive(Clone)]
pub struct Reaction {
    /// Generated identifier.
    pub id: ReactionId,
    /// Name used when imbuing entities and in snapshots.
    pub name: String,
    /// Name (or synonym) of the skill this reaction answers.
    pub responds_to: String,
    handler: Arc<dyn Respondable>,
}

impl Reaction {
    /// Create a reaction from a closure or function.
    pub fn new<F>(name: impl Into<String>, responds_to: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Engine, &EntityId, &EntityId, &Mapping) -> EngineResult<Option<Mapping>>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(name, responds_to, Arc::new(handler))
    }

    /// Create a reaction from any [`Respondable`].
    pub fn from_handler(
        name: impl Into<String>,
        responds_to: impl Into<String>,
        handler: Arc<dyn Respondable>,
    ) -> Self {
        Self {
            id: ReactionId::new(),
            name: name.into(),
            responds_to: responds_to.into(),
            handler,
        }
    }

    /// A shared handle to the handler.
    pub fn handler(&self) -> Arc<dyn Respondable> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("responds_to", &self.responds_to)
            .finish()
    }
}

/// A named event-bound behavior.
#[derive(Clone)]
pub struct Script {
    /// Name used by event bindings and snapshots.
    pub name: String,
    handler: Arc<dyn Scriptable>,
}

impl Script {
    /// Create a script from a closure or function.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Engine, &EntityId, &EventPayload) -> EngineResult<()> + Send + Sync + 'static,
    {
        Self::from_handler(name, Arc::new(handler))
    }

    /// Create a script from any [`Scriptable`].
    pub fn from_handler(name: impl Into<String>, handler: Arc<dyn Scriptable>) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }

    /// A shared handle to the handler.
    pub fn handler(&self) -> Arc<dyn Scriptable> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script").field("name", &self.name).finish()
    }
}

/// The skill, reaction, and script registries with their name indexes.
///
/// Populated once at startup. Registration order is remembered everywhere
/// it can influence behavior.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    skills: HashMap<SkillId, Skill>,
    reactions: HashMap<ReactionId, Reaction>,
    scripts: HashMap<String, Script>,

    // Indexes
    skill_keywords: HashMap<String, SkillId>,
    reactions_by_skill: HashMap<SkillId, Vec<ReactionId>>,
    reactions_by_name: HashMap<String, Vec<ReactionId>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a skill and index its lower-cased name and synonyms.
    /// A keyword that already resolves elsewhere is overwritten.
    pub fn add_skill(&mut self, skill: Skill) -> SkillId {
        let id = skill.id;
        for keyword in skill.keywords() {
            self.skill_keywords.insert(keyword, id);
        }
        debug!(skill = %skill.name, %id, "registered skill");
        self.skills.insert(id, skill);
        id
    }

    /// Register a reaction against an already-registered skill.
    pub fn add_reaction(&mut self, reaction: Reaction) -> EngineResult<ReactionId> {
        let skill_id = self
            .skill_id(&reaction.responds_to)
            .ok_or_else(|| EngineError::UnknownSkill(reaction.responds_to.clone()))?;

        let id = reaction.id;
        self.reactions_by_skill.entry(skill_id).or_default().push(id);
        self.reactions_by_name
            .entry(reaction.name.clone())
            .or_default()
            .push(id);
        debug!(reaction = %reaction.name, skill = %reaction.responds_to, %id, "registered reaction");
        self.reactions.insert(id, reaction);
        Ok(id)
    }

    /// Register a script. A script with the same name is replaced.
    pub fn add_script(&mut self, script: Script) {
        debug!(script = %script.name, "registered script");
        self.scripts.insert(script.name.clone(), script);
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Resolve a skill name or synonym (case-insensitive).
    pub fn skill_id(&self, name: &str) -> Option<SkillId> {
        self.skill_keywords.get(&name.to_lowercase()).copied()
    }

    /// Get a skill by ID.
    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    /// Get a reaction by ID.
    pub fn reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(&id)
    }

    /// Every reaction registered under `name`, in registration order.
    pub fn reactions_by_name(&self, name: &str) -> Vec<&Reaction> {
        self.reactions_by_name
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.reactions.get(id)).collect())
            .unwrap_or_default()
    }

    /// The first reaction registered under `name`.
    pub fn reaction_id(&self, name: &str) -> Option<ReactionId> {
        self.reactions_by_name
            .get(name)
            .and_then(|ids| ids.first())
            .copied()
    }

    /// IDs of the reactions answering a skill, in registration order.
    pub fn reaction_ids_for_skill(&self, skill: SkillId) -> &[ReactionId] {
        self.reactions_by_skill
            .get(&skill)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// IDs of the reactions answering the skill with this name or synonym.
    pub fn reaction_ids_for_skill_name(&self, name: &str) -> &[ReactionId] {
        match self.skill_id(name) {
            Some(id) => self.reaction_ids_for_skill(id),
            None => &[],
        }
    }

    /// Get a script by name.
    pub fn script(&self, name: &str) -> Option<&Script> {
        self.scripts.get(name)
    }

    /// Number of registered skills.
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Number of registered reactions.
    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// Number of registered scripts.
    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }
}
