use thiserror::Error;

use crate::events::EventKind;

/// Errors returned by document operations.
///
/// Every variant except [`CoreError::EmptyRecord`] is a deterministic
/// function of the request and the current document; callers report them to
/// the client as-is. `EmptyRecord` means the document broke its own
/// invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The key has never been created.
    #[error("key {key:?} does not exist")]
    NotFound {
        /// Requested key.
        key: String,
    },
    /// Create on a key whose latest event is live.
    #[error("key {key:?} already exists")]
    KeyExists {
        /// Requested key.
        key: String,
    },
    /// Update or delete on a key whose latest event is a delete.
    #[error("key {key:?} has been deleted")]
    KeyDeleted {
        /// Requested key.
        key: String,
    },
    /// Create body is not a JSON object with exactly one non-empty string value.
    #[error("create body must be a JSON object holding exactly one key and a non-empty string value")]
    InvalidBody,
    /// Update value is empty.
    #[error("update value must be non-empty")]
    InvalidValue,
    /// A record with no events was found.
    #[error("key {key:?} has an empty event record")]
    EmptyRecord {
        /// Key owning the empty record.
        key: String,
    },
}

impl CoreError {
    /// Returns true if the error signals broken internal consistency rather
    /// than a rejected request.
    pub fn is_internal(&self) -> bool {
        matches!(self, CoreError::EmptyRecord { .. })
    }
}

/// Errors raised while decoding a persisted document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A create or update event has no string value.
    #[error("{kind} event is missing its value")]
    MissingValue {
        /// Kind of the offending event.
        kind: EventKind,
    },
    /// A delete event carries a non-empty value.
    #[error("delete event carries a value")]
    DeleteWithValue,
    /// A record holds no events.
    #[error("event record is empty")]
    EmptyRecord,
    /// A record does not start with a create event.
    #[error("event record starts with {kind} instead of create")]
    FirstNotCreate {
        /// Kind of the first event.
        kind: EventKind,
    },
}
