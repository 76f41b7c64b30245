use serde::{Deserialize, Serialize, Serializer};

use crate::errors::SchemaError;
use crate::events::{Event, EventKind};

/// Derived state of a key, computed from its latest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState<'a> {
    /// Key has never been created.
    Absent,
    /// Key holds a value.
    Live(&'a str),
    /// Latest event is a delete (or carries an empty value).
    Deleted,
}

impl<'a> KeyState<'a> {
    /// Derives the state of a key from its latest event.
    pub fn from_latest(event: &'a Event) -> Self {
        match event.value() {
            Some(value) if event.is_live() => KeyState::Live(value),
            _ => KeyState::Deleted,
        }
    }

    /// Returns the live value, if any.
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            KeyState::Live(value) => Some(value),
            _ => None,
        }
    }
}

/// Append-only history of a single key.
///
/// A record always starts with a create. Records built through [`KeyRecord::new`]
/// or decoded from JSON hold that invariant; the only mutation is
/// [`KeyRecord::append`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Event>")]
pub struct KeyRecord {
    events: Vec<Event>,
}

impl KeyRecord {
    /// Starts a new record with a create event.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            events: vec![Event::Create(value.into())],
        }
    }

    /// Returns the latest event, or `None` if the record is empty.
    pub fn latest(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Returns all events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the record holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self { events: Vec::new() }
    }
}

impl TryFrom<Vec<Event>> for KeyRecord {
    type Error = SchemaError;

    fn try_from(events: Vec<Event>) -> Result<Self, Self::Error> {
        match events.first() {
            None => Err(SchemaError::EmptyRecord),
            Some(first) if first.kind() != EventKind::Create => {
                Err(SchemaError::FirstNotCreate { kind: first.kind() })
            }
            Some(_) => Ok(Self { events }),
        }
    }
}

impl Serialize for KeyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.events.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_of_latest_event() {
        let live = Event::Update("v".to_string());
        assert_eq!(KeyState::from_latest(&live), KeyState::Live("v"));
        assert_eq!(KeyState::from_latest(&Event::Delete), KeyState::Deleted);
        let legacy = Event::Create(String::new());
        assert_eq!(KeyState::from_latest(&legacy), KeyState::Deleted);
    }

    #[test]
    fn record_must_start_with_create() {
        let result: Result<KeyRecord, _> = serde_json::from_value(json!([
            {"event": "update", "value": "v"}
        ]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("starts with update"), "{err}");
    }

    #[test]
    fn record_must_not_be_empty() {
        let result: Result<KeyRecord, _> = serde_json::from_value(json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn record_serializes_as_plain_array() {
        let mut record = KeyRecord::new("v1");
        record.append(Event::Delete);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!([
                {"event": "create", "value": "v1"},
                {"event": "delete", "value": ""}
            ])
        );
    }
}
