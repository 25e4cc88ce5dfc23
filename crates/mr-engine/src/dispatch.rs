//! Command dispatch and reaction resolution.

use std::fmt;

use mr_core::{Color, CoreError, EntityId, Mapping, Message, ReactionId, SkillId, StyledText};
use tracing::{debug, warn};

use crate::diagnostic::DiagnosticKind;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::tokenizer::split_args;

/// Engine-level commands handled before the skill index is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// List the built-in commands.
    Help,
    /// List the caller's skills.
    Skills,
    /// Leave the game. The engine only reports it; the host acts on it.
    Quit,
}

impl Builtin {
    /// Every built-in, in the order `help` lists them.
    pub const ALL: [Builtin; 3] = [Builtin::Help, Builtin::Skills, Builtin::Quit];

    /// The keyword that triggers this built-in.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Skills => "skills",
            Self::Quit => "quit",
        }
    }

    /// One-line description shown by `help`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Help => "See this help message",
            Self::Skills => "Show your available skills (things you can do).",
            Self::Quit => "Exit the game.",
        }
    }

    /// Match a verb against the built-ins (case-insensitive).
    pub fn from_keyword(verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.keyword().eq_ignore_ascii_case(verb))
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How [`Engine::parse`] routed a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A built-in command ran.
    Builtin(Builtin),
    /// A skill handler ran.
    Skill(SkillId),
    /// Nothing matched; the input was discarded without output.
    Ignored,
}

fn header(text: &str) -> Message {
    StyledText::new(text, Color::Yellow).bold().into()
}

fn listing(name: &str, description: &str) -> Message {
    Message::List(vec![
        StyledText::new(name, Color::Cyan).into(),
        Message::from(format!(" | {description}")),
    ])
}

impl Engine {
    /// Handle one line of player input on behalf of `caller`.
    ///
    /// Built-ins are tried first, then the skill index. Anything else,
    /// including text the tokenizer rejects, is dropped silently: no output
    /// and no error. Errors returned come from the skill handler itself.
    pub fn parse(&mut self, raw: &str, caller: &EntityId) -> EngineResult<Dispatch> {
        let tokens = match split_args(raw) {
            Ok(tokens) => tokens,
            Err(err) => {
                debug!(%caller, %err, "input ignored");
                return Ok(Dispatch::Ignored);
            }
        };
        let Some(verb) = tokens.first() else {
            return Ok(Dispatch::Ignored);
        };

        if let Some(builtin) = Builtin::from_keyword(verb) {
            self.run_builtin(builtin, caller);
            return Ok(Dispatch::Builtin(builtin));
        }

        let Some(skill) = self.catalog.skill_id(verb) else {
            debug!(%caller, verb = %verb, "no such skill, input ignored");
            return Ok(Dispatch::Ignored);
        };

        if self.config.require_entitlement
            && !self
                .registry
                .get(caller)
                .is_some_and(|e| e.skills.contains(skill))
        {
            debug!(%caller, %skill, "caller not entitled, input ignored");
            return Ok(Dispatch::Ignored);
        }

        self.invoke_skill(skill, &tokens, caller)?;
        Ok(Dispatch::Skill(skill))
    }

    /// Invoke a skill from command text, skipping built-ins and entitlement.
    ///
    /// For scripts and for skills that chain into other skills. Unlike
    /// [`Engine::parse`], an unknown verb is a content error.
    pub fn use_skill(&mut self, raw: &str, caller: &EntityId) -> EngineResult<()> {
        let tokens = split_args(raw)?;
        let verb = tokens
            .first()
            .ok_or_else(|| EngineError::UnknownSkill(String::new()))?;
        let skill = self
            .catalog
            .skill_id(verb)
            .ok_or_else(|| EngineError::UnknownSkill(verb.clone()))?;
        self.invoke_skill(skill, &tokens, caller)
    }

    /// Run a skill's handler with already-split tokens.
    pub fn invoke_skill(
        &mut self,
        skill: SkillId,
        tokens: &[String],
        caller: &EntityId,
    ) -> EngineResult<()> {
        let handler = self
            .catalog
            .skill(skill)
            .ok_or(EngineError::SkillNotFound(skill))?
            .handler();
        debug!(%caller, %skill, "invoking skill");
        handler.invoke(self, tokens, skill, caller)
    }

    /// Ask `target` to answer `skill` performed by `actor`.
    ///
    /// Candidates are the target's reactions that are registered against the
    /// skill, in registration order. With none, the answer is `Ok(None)`: the
    /// target cannot do that. With several, the first registered wins and one
    /// [`DiagnosticKind::ReactionConflict`] is recorded.
    pub fn react_to(
        &mut self,
        actor: &EntityId,
        skill: SkillId,
        target: &EntityId,
        params: &Mapping,
    ) -> EngineResult<Option<Mapping>> {
        let entity = self
            .registry
            .get(target)
            .ok_or_else(|| CoreError::EntityNotFound(target.clone()))?;

        let candidates: Vec<ReactionId> = self
            .catalog
            .reaction_ids_for_skill(skill)
            .iter()
            .copied()
            .filter(|id| entity.reactions.contains(*id))
            .collect();

        let Some(&chosen) = candidates.first() else {
            return Ok(None);
        };

        if candidates.len() > 1 {
            warn!(
                %actor,
                %target,
                %skill,
                candidates = candidates.len(),
                %chosen,
                "reaction conflict, using first registered"
            );
            let description = format!(
                "{target} holds {} reactions to skill {skill}; chose {chosen}",
                candidates.len()
            );
            self.record(
                DiagnosticKind::ReactionConflict {
                    skill,
                    actor: actor.clone(),
                    target: target.clone(),
                    candidates,
                    chosen,
                },
                description,
            );
        }

        let handler = self
            .catalog
            .reaction(chosen)
            .ok_or(EngineError::ReactionNotFound(chosen))?
            .handler();
        handler.respond(self, actor, target, params)
    }

    fn run_builtin(&mut self, builtin: Builtin, caller: &EntityId) {
        match builtin {
            Builtin::Help => {
                self.send_to(caller, header("Commands"));
                for b in Builtin::ALL {
                    self.send_to(caller, listing(b.keyword(), b.description()));
                }
            }
            Builtin::Skills => {
                let lines: Vec<Message> = self
                    .registry
                    .get(caller)
                    .map(|entity| {
                        entity
                            .skills
                            .iter()
                            .filter_map(|id| self.catalog.skill(id))
                            .map(|s| listing(&s.name, &s.description))
                            .collect()
                    })
                    .unwrap_or_default();
                self.send_to(caller, header("Skills"));
                if lines.is_empty() {
                    self.send_to(caller, "You have no skills.");
                }
                for line in lines {
                    self.send_to(caller, line);
                }
            }
            Builtin::Quit => debug!(%caller, "quit requested"),
        }
    }
}
