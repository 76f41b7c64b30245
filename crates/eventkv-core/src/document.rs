use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::events::Event;
use crate::record::{KeyRecord, KeyState};

/// The whole store: every key's event history.
///
/// Keys are kept in sorted order so the serialized document is
/// deterministic. The document is decoded in one step; once loaded, every
/// record is known to be non-empty and to start with a create.
///
/// All mutating operations validate first and append at most one event. A
/// rejected operation returns an error and leaves the document unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    records: BTreeMap<String, KeyRecord>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys ever created.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no key has ever been created.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over keys and their records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyRecord)> {
        self.records.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Returns the record for `key`, if it was ever created.
    pub fn record(&self, key: &str) -> Option<&KeyRecord> {
        self.records.get(key)
    }

    /// Derives the current state of `key`.
    pub fn state(&self, key: &str) -> Result<KeyState<'_>, CoreError> {
        match self.records.get(key) {
            None => Ok(KeyState::Absent),
            Some(record) => {
                let latest = record.latest().ok_or_else(|| CoreError::EmptyRecord {
                    key: key.to_string(),
                })?;
                Ok(KeyState::from_latest(latest))
            }
        }
    }

    /// Creates `key` with `value`, or re-creates it after a delete.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidBody`] if `value` is empty
    /// - [`CoreError::KeyExists`] if the key is live
    pub fn create(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        if value.is_empty() {
            return Err(CoreError::InvalidBody);
        }
        match self.liveness(key)? {
            None => {
                self.records.insert(key.to_string(), KeyRecord::new(value));
                Ok(())
            }
            Some(true) => Err(CoreError::KeyExists {
                key: key.to_string(),
            }),
            Some(false) => self.append(key, Event::Create(value.to_string())),
        }
    }

    /// Reads the current state of an existing key.
    ///
    /// Returns [`KeyState::Live`] with the value, or [`KeyState::Deleted`].
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the key was never created
    pub fn read(&self, key: &str) -> Result<KeyState<'_>, CoreError> {
        match self.state(key)? {
            KeyState::Absent => Err(CoreError::NotFound {
                key: key.to_string(),
            }),
            state => Ok(state),
        }
    }

    /// Replaces the value of a live key.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidValue`] if `value` is empty
    /// - [`CoreError::NotFound`] if the key was never created
    /// - [`CoreError::KeyDeleted`] if the key is deleted
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        if value.is_empty() {
            return Err(CoreError::InvalidValue);
        }
        self.require_live(key)?;
        self.append(key, Event::Update(value.to_string()))
    }

    /// Deletes a live key. Its history is kept.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the key was never created
    /// - [`CoreError::KeyDeleted`] if the key is already deleted
    pub fn delete(&mut self, key: &str) -> Result<(), CoreError> {
        self.require_live(key)?;
        self.append(key, Event::Delete)
    }

    /// Returns the full history of `key` in insertion order.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the key was never created
    pub fn history(&self, key: &str) -> Result<&[Event], CoreError> {
        self.records
            .get(key)
            .map(KeyRecord::events)
            .ok_or_else(|| CoreError::NotFound {
                key: key.to_string(),
            })
    }

    // None: absent, Some(live) otherwise.
    fn liveness(&self, key: &str) -> Result<Option<bool>, CoreError> {
        Ok(match self.state(key)? {
            KeyState::Absent => None,
            KeyState::Live(_) => Some(true),
            KeyState::Deleted => Some(false),
        })
    }

    fn require_live(&self, key: &str) -> Result<(), CoreError> {
        match self.liveness(key)? {
            None => Err(CoreError::NotFound {
                key: key.to_string(),
            }),
            Some(false) => Err(CoreError::KeyDeleted {
                key: key.to_string(),
            }),
            Some(true) => Ok(()),
        }
    }

    fn append(&mut self, key: &str, event: Event) -> Result<(), CoreError> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| CoreError::NotFound {
                key: key.to_string(),
            })?;
        record.append(event);
        Ok(())
    }
}
