use crate::error::StoreError;
use eventkv_core::Document;

/// Whole-document storage backend.
///
/// Implementations load and save the entire document in one call. They are
/// not required to provide atomicity across a load and a later save, and
/// callers must not assume it.
pub trait DocumentStore: Send + Sync {
    /// Loads and decodes the current document.
    fn load(&self) -> Result<Document, StoreError>;

    /// Replaces the stored document with `doc`.
    fn save(&self, doc: &Document) -> Result<(), StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn load(&self) -> Result<Document, StoreError> {
        (**self).load()
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        (**self).save(doc)
    }
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Document, StoreError> {
    serde_json::from_slice(bytes).map_err(StoreError::Parse)
}

pub(crate) fn encode(doc: &Document) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(doc).map_err(StoreError::Serialize)
}
