use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the registry or snapshots.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity with the same ID is already registered.
    #[error("entity already exists: {0}")]
    DuplicateId(EntityId),

    /// The requested entity ID does not exist in the registry.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
