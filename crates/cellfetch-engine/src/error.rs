//! Errors reported by the engine
//!
//! Every failure is surfaced to the caller as a value; nothing here is
//! fatal to the process. Transfer failures carry the HTTP engine's own
//! diagnostic text.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Handle does not refer to any slot in the registry
    #[error("invalid handle {0:#018x}")]
    InvalidHandle(u64),

    /// Handle refers to a slot whose resource was released
    #[error("stale handle {0:#018x}: resource was released")]
    StaleHandle(u64),

    /// Handle belongs to a different resource kind
    #[error("handle kind mismatch: expected {expected}, got {got}")]
    KindMismatch {
        /// Kind the registry holds
        expected: &'static str,
        /// Kind encoded in the handle
        got: String,
    },

    /// No free slot indices remain
    #[error("handle registry full")]
    RegistryFull,

    /// Unsupported session option key
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Option value rejected
    #[error("invalid value for option {key}: {value}")]
    InvalidOptionValue {
        /// Option key
        key: String,
        /// Rejected value
        value: String,
    },

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Perform called on a session with no URL configured
    #[error("no URL configured for session")]
    MissingUrl,

    /// Response exceeded the configured size cap
    #[error("response too large: {size} bytes (max: {max})")]
    ResponseTooLarge {
        /// Bytes received so far
        size: u64,
        /// Configured maximum
        max: u64,
    },

    /// HTTP engine error (DNS, connect, TLS, timeout, read)
    #[error("transfer failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (worker spawn)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
