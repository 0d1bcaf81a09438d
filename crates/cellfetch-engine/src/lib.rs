//! cellfetch engine: HTTP transfers behind opaque handles
//!
//! The engine owns every stateful resource the host refers to: transfer
//! sessions and text buffers live in generational handle registries, and
//! the host only ever sees opaque handle numbers. Synchronous performs
//! stream into the session's own sink; asynchronous performs run on
//! detached worker threads and report back through an exactly-once
//! completion token.
//!
//! Entry points:
//! - [`Engine::start`] / [`Engine::stop`]: explicit lifecycle
//! - [`functions::register_all`]: expose the operation surface by name

pub mod bridge;
pub mod engine;
pub mod error;
pub mod functions;
pub mod handles;
pub mod session;
pub mod text;

pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use handles::{Handle, HandleRegistry, ResourceKind};
pub use session::TransferSession;
pub use text::{SharedTextBuffer, TextBuffer};
