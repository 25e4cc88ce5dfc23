//! The magic-rpg engine.
//!
//! An [`Engine`] owns one world: the entity registry from `mr-core`, the
//! skill/reaction/script [`Catalog`], event bindings, a simulated clock, and
//! the [`Outbox`] that handlers write to. Content is plugged in through the
//! extension contract in [`catalog`]; hosts drive the engine with
//! [`Engine::parse`] and [`Engine::tick`] and persist it with
//! [`Engine::dump_state`] / [`Engine::load_state`].

/// Skill, reaction, and script registries and the handler traits.
pub mod catalog;
/// Simulated clock advanced by ticks.
pub mod clock;
/// Engine configuration.
pub mod config;
/// Diagnostics recorded for content authors.
pub mod diagnostic;
/// Built-in commands, command dispatch, and reaction resolution.
pub mod dispatch;
/// The world context passed to every handler.
pub mod engine;
/// Error types for the engine crate.
pub mod error;
/// Event payloads and listener bindings.
pub mod event;
/// Output sink and client associations.
pub mod outbox;
/// Snapshot dump and restore.
pub mod persist;
/// Command-line tokenizer.
pub mod tokenizer;

/// Re-exports of the catalog types and handler traits.
pub use catalog::{Catalog, Invocable, Reaction, Respondable, Script, Scriptable, Skill};
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-exports of [`diagnostic::Diagnostic`], [`diagnostic::DiagnosticKind`], and [`diagnostic::DiagnosticLog`].
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticLog};
/// Re-exports of [`dispatch::Builtin`] and [`dispatch::Dispatch`].
pub use dispatch::{Builtin, Dispatch};
/// Re-export of [`engine::Engine`].
pub use engine::Engine;
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-exports of the event types.
pub use event::{EventBus, EventPayload, ListenerBinding, TICK_EVENT};
/// Re-exports of the output types.
pub use outbox::{ClientId, Delivery, OutputSink, Outbox};
/// Re-export of [`tokenizer::split_args`].
pub use tokenizer::split_args;
