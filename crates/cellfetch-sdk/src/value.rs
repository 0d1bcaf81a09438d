//! CellValue: the value type crossing the host boundary
//!
//! A spreadsheet cell carries one of a small set of scalar shapes. Handles
//! get their own variant instead of riding in the number slot so that a
//! handle can never be silently misread as an ordinary number.

/// A single value as seen by the host: a cell's content, a function
/// argument, or a function result.
///
/// # Thread Safety
///
/// `CellValue` is `Send + Sync`. Values are owned; there is no shared
/// mutable state behind a value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// An empty cell / missing argument
    Empty,
    /// A boolean cell
    Bool(bool),
    /// A numeric cell
    Number(f64),
    /// A text cell
    Text(String),
    /// An opaque handle to an engine-owned resource
    Handle(u64),
}

impl CellValue {
    /// Create an empty value
    pub fn empty() -> Self {
        CellValue::Empty
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        CellValue::Bool(b)
    }

    /// Create a numeric value
    pub fn number(n: f64) -> Self {
        CellValue::Number(n)
    }

    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a handle value from raw handle bits
    pub fn handle(h: u64) -> Self {
        CellValue::Handle(h)
    }

    /// Check if this is the empty value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as f64 if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the raw handle bits if this is a handle
    pub fn as_handle(&self) -> Option<u64> {
        match self {
            CellValue::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Bool(_) => "bool",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Handle(_) => "handle",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let v = CellValue::empty();
        assert!(v.is_empty());
        assert!(v.as_number().is_none());
        assert!(v.as_handle().is_none());
    }

    #[test]
    fn test_bool() {
        let t = CellValue::bool(true);
        let f = CellValue::bool(false);
        assert_eq!(t.as_bool(), Some(true));
        assert_eq!(f.as_bool(), Some(false));
        assert!(!t.is_empty());
    }

    #[test]
    fn test_number() {
        let v = CellValue::number(3.14159);
        assert!((v.as_number().unwrap() - 3.14159).abs() < 1e-10);
        assert!(v.as_text().is_none());
    }

    #[test]
    fn test_text() {
        let v = CellValue::text("hello");
        assert_eq!(v.as_text(), Some("hello"));
        assert!(v.as_number().is_none());
    }

    #[test]
    fn test_handle_is_not_a_number() {
        let v = CellValue::handle(42);
        assert_eq!(v.as_handle(), Some(42));
        assert!(v.as_number().is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(CellValue::empty().type_name(), "empty");
        assert_eq!(CellValue::bool(true).type_name(), "bool");
        assert_eq!(CellValue::number(1.0).type_name(), "number");
        assert_eq!(CellValue::text("x").type_name(), "text");
        assert_eq!(CellValue::handle(1).type_name(), "handle");
    }
}
