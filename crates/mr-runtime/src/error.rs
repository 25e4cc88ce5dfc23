use mr_core::EntityId;
use mr_engine::{ClientId, EngineError};

/// Alias for `Result<T, RuntimeError>`.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised by the runtime loop or its handle.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The engine reported a content or configuration error.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A frame could not be encoded or decoded.
    #[error("frame serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A client tried to attach to an entity that does not exist.
    #[error("no such entity: {0}")]
    UnknownEntity(EntityId),

    /// The client name is already connected.
    #[error("client already connected: {0}")]
    ClientExists(ClientId),

    /// The runtime loop has stopped and no longer accepts requests.
    #[error("runtime stopped")]
    Stopped,
}
