use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::CoreResult;
use crate::value::Mapping;

/// One serialized entity. Capabilities are stored by name, never by ID,
/// because IDs are regenerated every time the catalogs are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// The entity's ID.
    pub id: EntityId,
    /// A copy of the entity's state.
    #[serde(default)]
    pub state: Mapping,
    /// Names of the reactions the entity holds.
    #[serde(default)]
    pub reactions: Vec<String>,
    /// Names of the skills the entity may invoke.
    #[serde(default)]
    pub skills: Vec<String>,
}

/// One serialized event binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerRecord {
    /// The entity the script runs on behalf of.
    pub listener: EntityId,
    /// Name of the script to run.
    pub script: String,
}

/// A full world snapshot: every entity plus every event binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All live entities, in registry order.
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    /// Event name to bindings, each list in registration order.
    #[serde(default)]
    pub listeners: BTreeMap<String, Vec<ListenerRecord>>,
}

impl Snapshot {
    /// Encode as compact JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode as indented JSON, for files meant to be read by people.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
