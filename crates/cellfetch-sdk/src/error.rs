//! Error types for the host boundary

/// Result type for host-boundary operations
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported across the host function boundary
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// Type mismatch during argument conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Invalid argument
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// Call failed inside the engine
    #[error("{0}")]
    CallError(String),
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError::CallError(s)
    }
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError::CallError(s.to_string())
    }
}
