use mr_core::{CoreError, EntityId, ReactionId, SkillId};

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the engine.
///
/// Apart from `UnterminatedQuote`, these signal catalog or content
/// misconfiguration and are meant to be propagated, not recovered from.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Registry or snapshot failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No skill is registered under this name or synonym.
    #[error("unknown skill: \"{0}\"")]
    UnknownSkill(String),

    /// No reaction is registered under this name.
    #[error("unknown reaction: \"{0}\"")]
    UnknownReaction(String),

    /// No script is registered under this name.
    #[error("unknown script: \"{0}\"")]
    UnknownScript(String),

    /// A skill ID that is not in the catalog.
    #[error("skill not found: {0}")]
    SkillNotFound(SkillId),

    /// A reaction ID that is not in the catalog.
    #[error("reaction not found: {0}")]
    ReactionNotFound(ReactionId),

    /// A state value holds a NaN or infinite float, which a snapshot
    /// cannot represent.
    #[error("entity {id} has a non-finite number under \"{key}\"")]
    NonFiniteState {
        /// Entity that owns the value.
        id: EntityId,
        /// State key holding it.
        key: String,
    },

    /// Command text opened a quote and never closed it.
    #[error("unterminated quote starting at byte {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A skill, reaction, or script handler reported a failure.
    #[error("handler failed: {0}")]
    Handler(String),
}
