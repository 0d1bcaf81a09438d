//! Completion tokens: exactly-once delivery of asynchronous results
//!
//! A worker thread finishing a background transfer must hand its result
//! back to the single-threaded host exactly once. The token is consumed by
//! value on delivery, so a double send does not compile; the queue end is a
//! channel drained by one dispatcher on the host side.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Outcome of one asynchronous submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Transfer finished; payload is the raw handle of the output buffer.
    Done(u64),
    /// Transfer failed with an engine-reported error.
    Failed(String),
}

/// A one-shot channel end handed to a background worker.
///
/// `complete` consumes the token, so each submission delivers at most one
/// notification by construction.
pub trait CompletionToken: Send {
    /// Deliver the completion. Consumes the token.
    fn complete(self: Box<Self>, completion: Completion);
}

/// Token that delivers into a [`CompletionQueue`].
pub struct QueueToken {
    tx: Sender<Completion>,
}

impl CompletionToken for QueueToken {
    fn complete(self: Box<Self>, completion: Completion) {
        // Receiver gone means the host shut down; nothing left to notify.
        let _ = self.tx.send(completion);
    }
}

/// Queue carrying completions from worker threads to the host's single
/// dispatcher.
pub struct CompletionQueue {
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl CompletionQueue {
    /// Create a new unbounded completion queue
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    /// Create a token that will deliver into this queue
    pub fn token(&self) -> Box<dyn CompletionToken> {
        Box::new(QueueToken {
            tx: self.tx.clone(),
        })
    }

    /// Take the next completion if one is ready (non-blocking)
    pub fn try_next(&self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next completion
    pub fn next_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Number of completions waiting to be dispatched
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for CompletionQueue {
    fn default() -> Self {
        Self::new()
    }
}
