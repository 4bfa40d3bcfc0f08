//! Memory-backed playable objects
//!
//! A finished clip's bytes are published as a revocable in-memory object,
//! the crate's equivalent of a blob URL: `create` hands out a reference,
//! `resolve` looks it up for a playback sink, and `revoke` releases the
//! backing memory. Revoking twice is an error; the controller is responsible
//! for revoking each reference exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Reference to a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef(Uuid);

impl ObjectRef {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mem:{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("object {0} was already revoked or never existed")]
    AlreadyRevoked(ObjectRef),
}

/// Store of revocable byte objects
pub trait ObjectStore: Send + Sync {
    /// Publish bytes, returning a reference to them.
    fn create(&self, bytes: Vec<u8>) -> ObjectRef;

    /// Look up a live object's bytes.
    fn resolve(&self, object: &ObjectRef) -> Option<Arc<[u8]>>;

    /// Release an object's backing memory.
    ///
    /// Must not be called twice on the same reference, and not while a
    /// playback sink is still bound to it.
    fn revoke(&self, object: &ObjectRef) -> Result<(), ObjectError>;
}

/// Default in-process store
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<ObjectRef, Arc<[u8]>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unrevoked) objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn create(&self, bytes: Vec<u8>) -> ObjectRef {
        let object = ObjectRef::new();
        tracing::debug!("creating object {} ({} bytes)", object, bytes.len());
        self.objects.lock().insert(object, Arc::from(bytes));
        object
    }

    fn resolve(&self, object: &ObjectRef) -> Option<Arc<[u8]>> {
        self.objects.lock().get(object).cloned()
    }

    fn revoke(&self, object: &ObjectRef) -> Result<(), ObjectError> {
        tracing::debug!("revoking object {}", object);
        self.objects
            .lock()
            .remove(object)
            .map(|_| ())
            .ok_or(ObjectError::AlreadyRevoked(*object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resolve_revoke() {
        let store = MemoryObjectStore::new();
        let object = store.create(vec![1, 2, 3]);

        let bytes = store.resolve(&object).unwrap();
        assert_eq!(&bytes[..], &[1, 2, 3]);
        assert_eq!(store.len(), 1);

        store.revoke(&object).unwrap();
        assert!(store.resolve(&object).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_double_revoke_rejected() {
        let store = MemoryObjectStore::new();
        let object = store.create(vec![0; 16]);

        store.revoke(&object).unwrap();
        assert_eq!(store.revoke(&object), Err(ObjectError::AlreadyRevoked(object)));
    }

    #[test]
    fn test_references_are_distinct() {
        let store = MemoryObjectStore::new();
        let a = store.create(vec![1]);
        let b = store.create(vec![1]);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
