//! Generational handle registry for engine-owned resources
//!
//! The host refers to sessions and buffers by opaque numeric handles. A
//! handle packs the resource kind, a per-slot generation, and a dense slot
//! index; lookups reject wrong-kind handles, vacant slots, and handles
//! whose slot was recycled since they were issued. Values are moved into
//! the registry, which is their sole owner and deleter; access is scoped
//! to a closure so no reference outlives registry control.

use parking_lot::Mutex;

use crate::error::{EngineError, EngineResult};

const INDEX_BITS: u32 = 32;
const GEN_BITS: u32 = 24;
const GEN_MASK: u64 = (1 << GEN_BITS) - 1;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Kind of resource a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
    /// HTTP transfer session
    Session = 1,
    /// Text buffer
    Text = 2,
}

impl ResourceKind {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(ResourceKind::Session),
            2 => Some(ResourceKind::Text),
            _ => None,
        }
    }

    /// Human-readable kind name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Session => "session",
            ResourceKind::Text => "text",
        }
    }
}

/// Opaque handle to a registry-owned resource.
///
/// Bit layout: `[kind:8 | generation:24 | index:32]`. The numeric value of
/// a released handle may be reissued only after the slot's generation has
/// moved on, so a stale handle can never alias a live resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    fn pack(kind: ResourceKind, generation: u32, index: u32) -> Self {
        let bits = ((kind as u64) << (GEN_BITS + INDEX_BITS))
            | (((generation as u64) & GEN_MASK) << INDEX_BITS)
            | (index as u64);
        Handle(bits)
    }

    /// Get the raw handle bits (as carried in a host cell)
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Reconstruct a handle from raw bits received from the host
    pub fn from_u64(bits: u64) -> Self {
        Handle(bits)
    }

    /// The resource kind encoded in the handle, if recognized
    pub fn kind(self) -> Option<ResourceKind> {
        ResourceKind::from_u8((self.0 >> (GEN_BITS + INDEX_BITS)) as u8)
    }

    fn generation(self) -> u32 {
        ((self.0 >> INDEX_BITS) & GEN_MASK) as u32
    }

    fn index(self) -> u32 {
        (self.0 & INDEX_MASK) as u32
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

struct Inner<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

/// Registry mapping opaque handles to owned values of one resource kind.
///
/// All mutations are serialized behind one lock; callers never hold the
/// lock across network I/O (they snapshot what they need inside the
/// closure and get out).
pub struct HandleRegistry<T> {
    kind: ResourceKind,
    inner: Mutex<Inner<T>>,
}

impl<T> HandleRegistry<T> {
    /// Create an empty registry for one resource kind
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            inner: Mutex::new(Inner {
                slots: Vec::new(),
                free: Vec::new(),
            }),
        }
    }

    /// Move a value into the registry and return its handle
    pub fn insert(&self, value: T) -> EngineResult<Handle> {
        let mut inner = self.inner.lock();
        let index = match inner.free.pop() {
            Some(index) => {
                inner.slots[index as usize].value = Some(value);
                index
            }
            None => {
                if inner.slots.len() as u64 > INDEX_MASK {
                    return Err(EngineError::RegistryFull);
                }
                inner.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                (inner.slots.len() - 1) as u32
            }
        };
        let generation = inner.slots[index as usize].generation;
        Ok(Handle::pack(self.kind, generation, index))
    }

    fn check(&self, handle: Handle) -> EngineResult<u32> {
        match handle.kind() {
            Some(kind) if kind == self.kind => {}
            Some(kind) => {
                return Err(EngineError::KindMismatch {
                    expected: self.kind.name(),
                    got: kind.name().to_string(),
                })
            }
            None => return Err(EngineError::InvalidHandle(handle.as_u64())),
        }
        Ok(handle.index())
    }

    /// Run `f` with a shared reference to the value behind `handle`
    pub fn with_ref<R>(&self, handle: Handle, f: impl FnOnce(&T) -> R) -> EngineResult<R> {
        let index = self.check(handle)? as usize;
        let inner = self.inner.lock();
        let slot = inner
            .slots
            .get(index)
            .ok_or(EngineError::InvalidHandle(handle.as_u64()))?;
        if slot.generation != handle.generation() {
            return Err(EngineError::StaleHandle(handle.as_u64()));
        }
        match &slot.value {
            Some(value) => Ok(f(value)),
            None => Err(EngineError::StaleHandle(handle.as_u64())),
        }
    }

    /// Run `f` with an exclusive reference to the value behind `handle`
    pub fn with_mut<R>(&self, handle: Handle, f: impl FnOnce(&mut T) -> R) -> EngineResult<R> {
        let index = self.check(handle)? as usize;
        let mut inner = self.inner.lock();
        let slot = inner
            .slots
            .get_mut(index)
            .ok_or(EngineError::InvalidHandle(handle.as_u64()))?;
        if slot.generation != handle.generation() {
            return Err(EngineError::StaleHandle(handle.as_u64()));
        }
        match &mut slot.value {
            Some(value) => Ok(f(value)),
            None => Err(EngineError::StaleHandle(handle.as_u64())),
        }
    }

    /// Destroy the value behind `handle` and recycle its slot.
    ///
    /// Failing on an unknown or already-released handle has no side effect.
    pub fn remove(&self, handle: Handle) -> EngineResult<T> {
        let index = self.check(handle)? as usize;
        let mut inner = self.inner.lock();
        let slot = inner
            .slots
            .get_mut(index)
            .ok_or(EngineError::InvalidHandle(handle.as_u64()))?;
        if slot.generation != handle.generation() {
            return Err(EngineError::StaleHandle(handle.as_u64()));
        }
        let value = slot
            .value
            .take()
            .ok_or(EngineError::StaleHandle(handle.as_u64()))?;
        slot.generation = (slot.generation + 1) & (GEN_MASK as u32);
        inner.free.push(index as u32);
        Ok(value)
    }

    /// Number of live resources
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.slots.len() - inner.free.len()
    }

    /// True if no resources are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every live resource (engine shutdown)
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let Inner { slots, free } = &mut *inner;
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = (slot.generation + 1) & (GEN_MASK as u32);
                free.push(index as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> HandleRegistry<String> {
        HandleRegistry::new(ResourceKind::Text)
    }

    #[test]
    fn test_insert_and_lookup() {
        let reg = registry();
        let h = reg.insert("hello".to_string()).unwrap();
        assert_eq!(h.kind(), Some(ResourceKind::Text));
        let len = reg.with_ref(h, |s| s.len()).unwrap();
        assert_eq!(len, 5);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_lookup_same_identity_until_release() {
        let reg = registry();
        let h = reg.insert("abc".to_string()).unwrap();
        reg.with_mut(h, |s| s.push_str("def")).unwrap();
        let content = reg.with_ref(h, |s| s.clone()).unwrap();
        assert_eq!(content, "abcdef");
    }

    #[test]
    fn test_lookup_after_release_fails() {
        let reg = registry();
        let h = reg.insert("x".to_string()).unwrap();
        assert_eq!(reg.remove(h).unwrap(), "x");
        assert!(matches!(
            reg.with_ref(h, |_| ()),
            Err(EngineError::StaleHandle(_))
        ));
        assert!(matches!(reg.remove(h), Err(EngineError::StaleHandle(_))));
    }

    #[test]
    fn test_slot_reuse_yields_distinct_handle() {
        let reg = registry();
        let h1 = reg.insert("first".to_string()).unwrap();
        reg.remove(h1).unwrap();
        let h2 = reg.insert("second".to_string()).unwrap();
        // Same slot, different generation
        assert_ne!(h1, h2);
        assert!(reg.with_ref(h1, |_| ()).is_err());
        assert_eq!(reg.with_ref(h2, |s| s.clone()).unwrap(), "second");
    }

    #[test]
    fn test_kind_mismatch() {
        let texts = registry();
        let sessions: HandleRegistry<u32> = HandleRegistry::new(ResourceKind::Session);
        let h = texts.insert("t".to_string()).unwrap();
        let err = sessions.with_ref(h, |_| ()).unwrap_err();
        match err {
            EngineError::KindMismatch { expected, got } => {
                assert_eq!(expected, "session");
                assert_eq!(got, "text");
            }
            other => panic!("expected kind mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_bits_rejected() {
        let reg = registry();
        let bogus = Handle::from_u64(0xFF00_0000_0000_0001);
        assert!(matches!(
            reg.with_ref(bogus, |_| ()),
            Err(EngineError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let reg = registry();
        let h = reg.insert("a".to_string()).unwrap();
        let bogus = Handle::from_u64(h.as_u64() + 100);
        assert!(matches!(
            reg.with_ref(bogus, |_| ()),
            Err(EngineError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_clear() {
        let reg = registry();
        let h1 = reg.insert("a".to_string()).unwrap();
        let h2 = reg.insert("b".to_string()).unwrap();
        assert_eq!(reg.len(), 2);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.with_ref(h1, |_| ()).is_err());
        assert!(reg.with_ref(h2, |_| ()).is_err());
    }

    #[test]
    fn test_handle_roundtrip_through_raw_bits() {
        let reg = registry();
        let h = reg.insert("abc".to_string()).unwrap();
        let bits = h.as_u64();
        let restored = Handle::from_u64(bits);
        assert_eq!(h, restored);
        assert_eq!(reg.with_ref(restored, |s| s.clone()).unwrap(), "abc");
    }
}
