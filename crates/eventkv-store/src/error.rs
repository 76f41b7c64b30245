//! Error types for store operations.

use eventkv_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not a valid document.
    #[error("parse error: {0}")]
    Parse(#[source] serde_json::Error),
    /// Document could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Data path exists but is not a regular file.
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

/// Errors returned by [`KvService`](crate::KvService) operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The operation was rejected by the event-log rules.
    #[error(transparent)]
    Rejected(#[from] CoreError),
    /// The backend failed to load or save the document.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Returns true for failures the client did not cause: store errors and
    /// broken document invariants.
    pub fn is_unexpected(&self) -> bool {
        match self {
            ServiceError::Rejected(err) => err.is_internal(),
            ServiceError::Store(_) => true,
        }
    }
}
