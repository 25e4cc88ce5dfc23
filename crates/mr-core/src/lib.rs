//! Core types for magic-rpg: entities, state values, and the object registry.
//!
//! This crate holds the data model the engine operates on. It knows nothing
//! about skills being invoked or scripts firing; capability sets are plain
//! identifier lists here and get their meaning from `mr-engine`.

/// Insertion-ordered capability sets and the skill/reaction identifiers they hold.
pub mod capability;
/// Entity identifiers and the entity struct.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Output messages pushed to clients (plain, styled, composite).
pub mod message;
/// The object registry that owns every live entity.
pub mod registry;
/// Serialized world snapshots.
pub mod snapshot;
/// Opaque state values stored on entities.
pub mod value;

/// Re-export capability types.
pub use capability::{CapabilitySet, ReactionId, SkillId};
/// Re-export core entity types.
pub use entity::{Entity, EntityId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export message types.
pub use message::{Color, Message, StyledText};
/// Re-export the registry.
pub use registry::Registry;
/// Re-export snapshot types.
pub use snapshot::{ListenerRecord, ObjectRecord, Snapshot};
/// Re-export value types.
pub use value::{Mapping, Value};
