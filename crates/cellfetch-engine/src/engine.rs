//! Engine lifecycle and operation surface
//!
//! One `Engine` instance owns every handle registry. The process entry
//! point (and each test) calls `start` once and `stop` once; nothing is
//! initialized behind a global constructor.

use std::sync::Arc;
use std::time::Duration;

use crate::error::EngineResult;
use crate::handles::{Handle, HandleRegistry, ResourceKind};
use crate::session::{self, TransferSession};
use crate::text::{SharedTextBuffer, TextBuffer};

/// Default transfer timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on a single response body (50 MB)
const DEFAULT_MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// Engine-wide defaults applied to newly created sessions
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Transfer timeout for new sessions
    pub timeout: Duration,
    /// User-Agent header for new sessions
    pub user_agent: String,
    /// Response size cap for new sessions
    pub max_response_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

/// The engine: owns sessions and text buffers, exposes the operation
/// surface the host functions are built on.
pub struct Engine {
    config: EngineConfig,
    pub(crate) sessions: HandleRegistry<TransferSession>,
    pub(crate) texts: HandleRegistry<SharedTextBuffer>,
}

impl Engine {
    /// Start an engine instance with the given defaults
    pub fn start(config: EngineConfig) -> Arc<Self> {
        tracing::debug!(?config, "engine started");
        Arc::new(Self {
            config,
            sessions: HandleRegistry::new(ResourceKind::Session),
            texts: HandleRegistry::new(ResourceKind::Text),
        })
    }

    /// Stop the engine: release every live resource. Idempotent.
    ///
    /// Worker threads still running keep their snapshots and buffer Arcs;
    /// their completions simply refer to handles that are no longer live.
    pub fn stop(&self) {
        let sessions = self.sessions.len();
        let texts = self.texts.len();
        self.sessions.clear();
        self.texts.clear();
        tracing::debug!(sessions, texts, "engine stopped");
    }

    // ── Sessions ──

    /// Create a transfer session, optionally bound to a URL
    pub fn session_create(&self, url: Option<&str>) -> EngineResult<Handle> {
        let session = TransferSession::new(&self.config, url)?;
        self.sessions.insert(session)
    }

    /// Forward a configuration option to a session
    pub fn session_set_option(&self, handle: Handle, key: &str, value: &str) -> EngineResult<()> {
        self.sessions
            .with_mut(handle, |s| s.set_option(key, value))?
    }

    /// Perform a session's transfer synchronously, returning the sink's
    /// full contents (including bytes retained from earlier performs).
    pub fn session_perform(&self, handle: Handle) -> EngineResult<Vec<u8>> {
        let (config, sink) = self.sessions.with_ref(handle, |s| s.snapshot())?;
        session::execute(&config, &sink)?;
        let bytes = sink.lock().as_bytes().to_vec();
        Ok(bytes)
    }

    /// Explicitly clear a session's output sink
    pub fn session_reset(&self, handle: Handle) -> EngineResult<()> {
        let sink = self.sessions.with_ref(handle, |s| s.sink())?;
        sink.lock().clear();
        Ok(())
    }

    /// Release a session and invalidate its handle
    pub fn session_release(&self, handle: Handle) -> EngineResult<()> {
        self.sessions.remove(handle).map(|_| ())
    }

    // ── Text buffers ──

    /// Create a text buffer with initial content
    pub fn text_create(&self, initial: &str) -> EngineResult<Handle> {
        self.texts.insert(TextBuffer::shared(initial))
    }

    /// Append to a text buffer
    pub fn text_append(&self, handle: Handle, s: &str) -> EngineResult<()> {
        let buffer = self.texts.with_ref(handle, |b| b.clone())?;
        buffer.lock().append(s.as_bytes());
        Ok(())
    }

    /// Read a substring of a text buffer (`count == 0` means to the end)
    pub fn text_substring(&self, handle: Handle, pos: usize, count: usize) -> EngineResult<String> {
        let buffer = self.texts.with_ref(handle, |b| b.clone())?;
        let s = buffer.lock().substring(pos, count);
        Ok(s)
    }

    /// Length of a text buffer in bytes
    pub fn text_len(&self, handle: Handle) -> EngineResult<usize> {
        let buffer = self.texts.with_ref(handle, |b| b.clone())?;
        let len = buffer.lock().len();
        Ok(len)
    }

    /// Release a text buffer and invalidate its handle
    pub fn text_release(&self, handle: Handle) -> EngineResult<()> {
        self.texts.remove(handle).map(|_| ())
    }

    // ── Info ──

    /// Version info rows for the transfer layer
    pub fn version_info(&self) -> Vec<(&'static str, String)> {
        session::version_info()
    }
}
