//! Async completion bridge
//!
//! `perform_async` validates both handles before any background work
//! starts, then hands a snapshot of the session to a detached worker
//! thread. The worker clears the output buffer, streams the transfer into
//! it, and delivers exactly one completion through the caller's token,
//! success or failure, never silence. The submitting thread returns
//! immediately and is never blocked on network I/O.

use cellfetch_sdk::{Completion, CompletionToken};

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::handles::Handle;
use crate::session;

impl Engine {
    /// Submit an asynchronous perform.
    ///
    /// Fails synchronously (and spawns nothing) if either handle is
    /// invalid. On success the transfer runs on its own thread; the
    /// invoking thread stays free to issue further commands. Exactly one
    /// completion is delivered per successful submission: `Done` with the
    /// output buffer handle, or `Failed` with the engine's diagnostic.
    pub fn perform_async(
        &self,
        session_handle: Handle,
        output_handle: Handle,
        token: Box<dyn CompletionToken>,
    ) -> EngineResult<()> {
        // Both lookups happen before any thread exists; an invalid handle
        // means no background work and no notification, ever.
        let (config, _own_sink) = self.sessions.with_ref(session_handle, |s| s.snapshot())?;
        let buffer = self.texts.with_ref(output_handle, |b| b.clone())?;

        std::thread::Builder::new()
            .name("cellfetch-transfer".to_string())
            .spawn(move || {
                buffer.lock().clear();
                match session::execute(&config, &buffer) {
                    Ok(()) => token.complete(Completion::Done(output_handle.as_u64())),
                    Err(e) => {
                        tracing::warn!(error = %e, "async transfer failed");
                        token.complete(Completion::Failed(e.to_string()));
                    }
                }
            })?;

        Ok(())
    }
}
