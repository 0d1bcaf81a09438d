//! Text buffer resource
//!
//! A mutable byte sequence held behind a handle: created with initial
//! content, appended to monotonically (by the host or by a transfer
//! worker), and read back by substring. Shared with worker threads as
//! `Arc<Mutex<TextBuffer>>` so appends never happen under a registry lock.

use parking_lot::Mutex;
use std::sync::Arc;

/// A text buffer shared between the registry and transfer workers
pub type SharedTextBuffer = Arc<Mutex<TextBuffer>>;

/// Append-only byte buffer with substring access.
///
/// Contents are raw bytes; substring reads decode lossily so a transfer
/// that returned non-UTF-8 data still yields something presentable.
#[derive(Debug, Default)]
pub struct TextBuffer {
    data: Vec<u8>,
}

impl TextBuffer {
    /// Create a buffer with initial content
    pub fn new(initial: &str) -> Self {
        Self {
            data: initial.as_bytes().to_vec(),
        }
    }

    /// Create a shared buffer with initial content
    pub fn shared(initial: &str) -> SharedTextBuffer {
        Arc::new(Mutex::new(Self::new(initial)))
    }

    /// Append raw bytes
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Current length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop all content
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// View the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Extract a substring starting at byte `pos`.
    ///
    /// `count == 0` means "from `pos` to the end". A `pos` past the end
    /// yields the empty string; a `count` past the end is clamped.
    pub fn substring(&self, pos: usize, count: usize) -> String {
        if pos >= self.data.len() {
            return String::new();
        }
        let end = if count == 0 {
            self.data.len()
        } else {
            pos.saturating_add(count).min(self.data.len())
        };
        String::from_utf8_lossy(&self.data[pos..end]).into_owned()
    }
}
