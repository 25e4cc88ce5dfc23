use mr_core::{EntityId, ReactionId, SkillId};

/// What kind of diagnostic was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// More than one of the target's reactions answers the skill.
    ReactionConflict {
        /// The skill being resolved.
        skill: SkillId,
        /// The entity acting.
        actor: EntityId,
        /// The entity being acted upon.
        target: EntityId,
        /// Every matching reaction, in registration order.
        candidates: Vec<ReactionId>,
        /// The reaction that was invoked.
        chosen: ReactionId,
    },
    /// A skill name or synonym was registered again and now points elsewhere.
    SkillShadowed {
        /// The lower-cased keyword.
        keyword: String,
        /// The skill the keyword used to resolve to.
        previous: SkillId,
        /// The skill it resolves to now.
        current: SkillId,
    },
}

impl DiagnosticKind {
    /// Check whether a given entity is involved in this diagnostic.
    pub fn involves(&self, id: &EntityId) -> bool {
        match self {
            Self::ReactionConflict { actor, target, .. } => actor == id || target == id,
            Self::SkillShadowed { .. } => false,
        }
    }
}

/// A record of something content authors should know about.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The engine tick when this was recorded.
    pub tick: u64,
    /// The specific kind of diagnostic.
    pub kind: DiagnosticKind,
    /// A human-readable description.
    pub description: String,
}

impl Diagnostic {
    /// Create a new diagnostic with the given tick, kind, and description.
    pub fn new(tick: u64, kind: DiagnosticKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates diagnostics, bounded to a maximum size.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
    max_entries: usize,
}

impl DiagnosticLog {
    /// Create a new log with the given maximum capacity (0 = unlimited).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append an entry, dropping the oldest entries if the log exceeds its capacity.
    pub fn push(&mut self, entry: Diagnostic) {
        self.entries.push(entry);
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded entries.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Return every reaction conflict recorded.
    pub fn conflicts(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::ReactionConflict { .. }))
            .collect()
    }

    /// Return all entries involving the given entity.
    pub fn entries_for_entity(&self, id: &EntityId) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.kind.involves(id)).collect()
    }

    /// Return the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all recorded entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
