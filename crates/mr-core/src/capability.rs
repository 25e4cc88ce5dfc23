use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a registered skill. Generated at registration and never
/// persisted; snapshots refer to skills by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub Uuid);

impl SkillId {
    /// Generate a new random skill ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SkillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Identifier of a registered reaction. Like [`SkillId`], never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionId(pub Uuid);

impl ReactionId {
    /// Generate a new random reaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A set of capability IDs that remembers insertion order.
///
/// Iteration order is the order members were first inserted, so anything
/// derived from a set (resolution order, snapshot name lists) is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet<T> {
    members: Vec<T>,
}

impl<T> Default for CapabilitySet<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<T: Copy + Eq> CapabilitySet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member. Returns `false` if it was already present.
    pub fn insert(&mut self, id: T) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    /// Remove a member. Returns `false` if it was not present.
    pub fn remove(&mut self, id: T) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }

    /// Check membership.
    pub fn contains(&self, id: T) -> bool {
        self.members.contains(&id)
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.members.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Return `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl<T: Copy + Eq> FromIterator<T> for CapabilitySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
