//! Asynchronous multi-client runtime for magic-rpg.
//!
//! One tokio task owns the [`mr_engine::Engine`]. Connection tasks talk to
//! it through a cloneable [`RuntimeHandle`] backed by a bounded request
//! queue; output comes back on an unbounded per-client channel of [`Frame`]s.
//! The network transport itself is left to the host.

/// Runtime configuration.
pub mod config;
/// Error types for the runtime crate.
pub mod error;
/// JSON frames exchanged with clients.
pub mod frame;
/// The engine-owning loop and its handle.
pub mod runtime;

/// Re-export of [`config::RuntimeConfig`].
pub use config::RuntimeConfig;
/// Re-exports of [`error::RuntimeError`] and [`error::RuntimeResult`].
pub use error::{RuntimeError, RuntimeResult};
/// Re-exports of the frame types.
pub use frame::{ClientFrame, Frame, FrameKind};
/// Re-exports of [`runtime::Runtime`], [`runtime::RuntimeHandle`], and [`runtime::Request`].
pub use runtime::{Request, Runtime, RuntimeHandle};
