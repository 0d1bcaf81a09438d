//! Traits for converting between `CellValue` and Rust types.
//!
//! Implement `FromCell` to receive a type as a function argument and
//! `ToCell` to return one as a function result.

use crate::error::{HostError, HostResult};
use crate::value::CellValue;

/// Convert from `CellValue` to a Rust type.
pub trait FromCell: Sized {
    /// Convert from a CellValue, failing with a type mismatch if the
    /// variant does not fit.
    fn from_cell(value: &CellValue) -> HostResult<Self>;
}

/// Convert from a Rust type to `CellValue`.
pub trait ToCell {
    /// Convert to a CellValue.
    fn to_cell(self) -> CellValue;
}

fn mismatch(expected: &str, value: &CellValue) -> HostError {
    HostError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

impl FromCell for f64 {
    fn from_cell(value: &CellValue) -> HostResult<Self> {
        value.as_number().ok_or_else(|| mismatch("number", value))
    }
}

impl ToCell for f64 {
    fn to_cell(self) -> CellValue {
        CellValue::Number(self)
    }
}

impl FromCell for bool {
    fn from_cell(value: &CellValue) -> HostResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl ToCell for bool {
    fn to_cell(self) -> CellValue {
        CellValue::Bool(self)
    }
}

impl FromCell for String {
    fn from_cell(value: &CellValue) -> HostResult<Self> {
        value
            .as_text()
            .map(String::from)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl ToCell for String {
    fn to_cell(self) -> CellValue {
        CellValue::Text(self)
    }
}

impl ToCell for &str {
    fn to_cell(self) -> CellValue {
        CellValue::Text(self.to_string())
    }
}

impl FromCell for u64 {
    fn from_cell(value: &CellValue) -> HostResult<Self> {
        value.as_handle().ok_or_else(|| mismatch("handle", value))
    }
}

impl ToCell for u64 {
    fn to_cell(self) -> CellValue {
        CellValue::Handle(self)
    }
}

// Unit type (for functions that return nothing)
impl ToCell for () {
    fn to_cell(self) -> CellValue {
        CellValue::Empty
    }
}
