//! Read-modify-write service over a [`DocumentStore`].

use crate::error::ServiceError;
use crate::traits::DocumentStore;
use eventkv_core::{CoreError, CreateRequest, Document, Event, KeyState};
use tracing::debug;

/// Result of reading a key that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The key's current value.
    Live(String),
    /// The key exists but its latest event is a delete.
    Deleted,
}

/// Runs event-log operations against a backend.
///
/// Each call loads the whole document, applies one operation and, only if
/// the operation succeeded, saves the whole document back. Nothing
/// serializes overlapping calls; see the crate docs. Store failures are
/// returned as [`ServiceError::Store`] and never retried.
#[derive(Debug)]
pub struct KvService<S> {
    store: S,
}

impl<S: DocumentStore> KvService<S> {
    /// Wraps a backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a key, or re-creates a deleted one.
    pub fn create(&self, request: &CreateRequest) -> Result<(), ServiceError> {
        self.mutate("create", &request.key, |doc| request.apply(doc))
    }

    /// Reads the current value of a key.
    pub fn read(&self, key: &str) -> Result<ReadOutcome, ServiceError> {
        let doc = self.store.load()?;
        let outcome = match doc.read(key)? {
            KeyState::Live(value) => ReadOutcome::Live(value.to_string()),
            KeyState::Deleted | KeyState::Absent => ReadOutcome::Deleted,
        };
        Ok(outcome)
    }

    /// Appends an update to a live key.
    pub fn update(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.mutate("update", key, |doc| doc.update(key, value))
    }

    /// Appends a delete to a live key.
    pub fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.mutate("delete", key, |doc| doc.delete(key))
    }

    /// Returns a key's full history.
    pub fn history(&self, key: &str) -> Result<Vec<Event>, ServiceError> {
        let doc = self.store.load()?;
        Ok(doc.history(key)?.to_vec())
    }

    fn mutate<F>(&self, op: &'static str, key: &str, apply: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut Document) -> Result<(), CoreError>,
    {
        let mut doc = self.store.load()?;
        if let Err(err) = apply(&mut doc) {
            debug!(op, key, error = %err, "operation rejected");
            return Err(err.into());
        }
        self.store.save(&doc)?;
        debug!(op, key, "operation applied");
        Ok(())
    }
}
