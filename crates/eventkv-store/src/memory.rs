//! In-memory backend.

use crate::error::StoreError;
use crate::file::EMPTY_DOCUMENT;
use crate::traits::{decode, encode, DocumentStore};
use eventkv_core::Document;
use std::sync::{Mutex, PoisonError};

/// Document held as serialized JSON bytes in memory.
///
/// Storing bytes rather than a live [`Document`] keeps the same decode step
/// as the file backend, so invalid content fails `load` in the same way.
#[derive(Debug)]
pub struct MemoryStore {
    bytes: Mutex<Vec<u8>>,
}

impl MemoryStore {
    /// Creates a store holding an empty document.
    pub fn new() -> Self {
        Self::from_bytes(EMPTY_DOCUMENT.to_vec())
    }

    /// Creates a store holding `bytes` as its serialized document.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(bytes),
        }
    }

    /// Returns a copy of the stored bytes.
    pub fn snapshot_bytes(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Document, StoreError> {
        decode(&self.snapshot_bytes())
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let encoded = encode(doc)?;
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = encoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_loads_empty_document() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.snapshot_bytes(), b"{}");
    }

    #[test]
    fn save_replaces_bytes() {
        let store = MemoryStore::new();
        let mut doc = Document::new();
        doc.create("k", "v").unwrap();
        store.save(&doc).unwrap();
        assert_eq!(
            store.snapshot_bytes(),
            br#"{"k":[{"event":"create","value":"v"}]}"#
        );
        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn invalid_bytes_fail_to_load() {
        let store = MemoryStore::from_bytes(b"[1,2]".to_vec());
        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
    }
}
