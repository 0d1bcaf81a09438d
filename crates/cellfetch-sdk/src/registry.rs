//! Named host function registry
//!
//! The host resolves function names (e.g. "fetch.sessionCreate",
//! "text.substr") to handler functions at registration time and dispatches
//! calls with a `&[CellValue]` argument slice. Errors never cross the
//! boundary as panics; they are carried in `CallResult::Error`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::value::CellValue;

/// Result of a host function call
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// Call handled successfully, returned a value
    Value(CellValue),
    /// Call failed with an error message
    Error(String),
}

impl CallResult {
    /// Create a successful result with the empty value
    #[inline]
    pub fn empty() -> Self {
        Self::Value(CellValue::Empty)
    }

    /// Create a successful result with a numeric value
    #[inline]
    pub fn number(n: f64) -> Self {
        Self::Value(CellValue::Number(n))
    }

    /// Create a successful result with a text value
    #[inline]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Value(CellValue::Text(s.into()))
    }

    /// Create a successful result with a handle value
    #[inline]
    pub fn handle(h: u64) -> Self {
        Self::Value(CellValue::Handle(h))
    }

    /// True if this is an error result
    pub fn is_error(&self) -> bool {
        matches!(self, CallResult::Error(_))
    }
}

/// A host function handler (for symbolic name-based dispatch)
pub type HostHandlerFn = Arc<dyn Fn(&[CellValue]) -> CallResult + Send + Sync>;

/// Registry of host functions indexed by symbolic name.
///
/// The engine registers its operation surface here at startup; the host
/// looks handlers up by name when a cell formula invokes one.
pub struct HostFunctionRegistry {
    handlers: HashMap<String, HostHandlerFn>,
}

impl HostFunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a host function by name
    pub fn register(
        &mut self,
        name: &str,
        handler: impl Fn(&[CellValue]) -> CallResult + Send + Sync + 'static,
    ) {
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    /// Get a handler by name
    pub fn get(&self, name: &str) -> Option<HostHandlerFn> {
        self.handlers.get(name).cloned()
    }

    /// Check if a handler is registered
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Invoke a registered function by name.
    ///
    /// An unknown name is reported as an error result, same as a failing
    /// call, so dispatch sites have a single failure path.
    pub fn call(&self, name: &str, args: &[CellValue]) -> CallResult {
        match self.handlers.get(name) {
            Some(handler) => handler(args),
            None => CallResult::Error(format!("unknown function: {}", name)),
        }
    }

    /// Get the number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Get all registered function names
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for HostFunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_call() {
        let mut registry = HostFunctionRegistry::new();
        registry.register("echo", |args| match args.first() {
            Some(CellValue::Text(s)) => CallResult::text(s.clone()),
            _ => CallResult::Error("echo: expected text".to_string()),
        });

        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let result = registry.call("echo", &[CellValue::text("hi")]);
        assert_eq!(result, CallResult::text("hi"));
    }

    #[test]
    fn test_call_unknown_function() {
        let registry = HostFunctionRegistry::new();
        let result = registry.call("nope", &[]);
        assert!(result.is_error());
    }

    #[test]
    fn test_handler_error_path() {
        let mut registry = HostFunctionRegistry::new();
        registry.register("fail", |_args| CallResult::Error("fail: boom".to_string()));
        match registry.call("fail", &[]) {
            CallResult::Error(msg) => assert!(msg.contains("boom")),
            other => panic!("expected error, got {:?}", other),
        }
    }
}
