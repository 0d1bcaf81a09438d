//! cellfetch SDK: the host-side ABI for cellfetch functions
//!
//! This crate provides the types a host integration needs to call into the
//! cellfetch engine without depending on engine internals: the `CellValue`
//! argument/result type, conversion traits, the named function registry,
//! and the completion-token machinery for asynchronous results.
//!
//! # Example
//!
//! ```ignore
//! use cellfetch_sdk::{CallResult, CellValue, HostFunctionRegistry};
//!
//! let mut registry = HostFunctionRegistry::new();
//! registry.register("math.add", |args| {
//!     let (a, b) = (args[0].as_number(), args[1].as_number());
//!     match (a, b) {
//!         (Some(a), Some(b)) => CallResult::number(a + b),
//!         _ => CallResult::Error("math.add: expected two numbers".into()),
//!     }
//! });
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod registry;
pub mod token;
pub mod value;

pub use convert::{FromCell, ToCell};
pub use error::{HostError, HostResult};
pub use registry::{CallResult, HostFunctionRegistry, HostHandlerFn};
pub use token::{Completion, CompletionQueue, CompletionToken, QueueToken};
pub use value::CellValue;
