use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SchemaError;

/// Kind tag of an event, serialized as `"create"`, `"update"` or `"delete"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Key was created (or re-created after a delete).
    Create,
    /// Value of a live key was replaced.
    Update,
    /// Key was deleted.
    Delete,
}

impl EventKind {
    /// Returns the wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One immutable entry of a key's history.
///
/// On the wire an event is `{"event": <kind>, "value": <string>}`. Deletes
/// are written with `"value": ""`; a delete without a `value` field is
/// accepted when reading and normalized to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventWire", into = "EventWire")]
pub enum Event {
    /// Create with its value.
    Create(String),
    /// Update with its new value.
    Update(String),
    /// Delete; carries no value.
    Delete,
}

impl Event {
    /// Returns the kind tag of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Create(_) => EventKind::Create,
            Event::Update(_) => EventKind::Update,
            Event::Delete => EventKind::Delete,
        }
    }

    /// Returns the carried value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Event::Create(value) | Event::Update(value) => Some(value),
            Event::Delete => None,
        }
    }

    /// Returns true if a key whose latest event is `self` holds a value.
    ///
    /// This is the only place the delete sentinel is interpreted: a delete,
    /// or a create/update holding an empty string, makes the key deleted.
    pub fn is_live(&self) -> bool {
        self.value().is_some_and(|value| !value.is_empty())
    }
}

#[derive(Serialize, Deserialize)]
struct EventWire {
    event: EventKind,
    #[serde(default)]
    value: Option<String>,
}

impl TryFrom<EventWire> for Event {
    type Error = SchemaError;

    fn try_from(wire: EventWire) -> Result<Self, Self::Error> {
        match (wire.event, wire.value) {
            (EventKind::Create, Some(value)) => Ok(Event::Create(value)),
            (EventKind::Update, Some(value)) => Ok(Event::Update(value)),
            (kind @ (EventKind::Create | EventKind::Update), None) => {
                Err(SchemaError::MissingValue { kind })
            }
            (EventKind::Delete, None) => Ok(Event::Delete),
            (EventKind::Delete, Some(value)) if value.is_empty() => Ok(Event::Delete),
            (EventKind::Delete, Some(_)) => Err(SchemaError::DeleteWithValue),
        }
    }
}

impl From<Event> for EventWire {
    fn from(event: Event) -> Self {
        let kind = event.kind();
        let value = match event {
            Event::Create(value) | Event::Update(value) => value,
            Event::Delete => String::new(),
        };
        EventWire {
            event: kind,
            value: Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delete_is_written_with_empty_value() {
        let json = serde_json::to_string(&Event::Delete).unwrap();
        assert_eq!(json, r#"{"event":"delete","value":""}"#);
    }

    #[test]
    fn create_keeps_field_order() {
        let json = serde_json::to_string(&Event::Create("v1".to_string())).unwrap();
        assert_eq!(json, r#"{"event":"create","value":"v1"}"#);
    }

    #[test]
    fn delete_without_value_is_normalized() {
        let event: Event = serde_json::from_value(json!({"event": "delete"})).unwrap();
        assert_eq!(event, Event::Delete);
        let event: Event = serde_json::from_value(json!({"event": "delete", "value": ""})).unwrap();
        assert_eq!(event, Event::Delete);
    }

    #[test]
    fn delete_with_value_is_rejected() {
        let result: Result<Event, _> =
            serde_json::from_value(json!({"event": "delete", "value": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn create_without_value_is_rejected() {
        let result: Result<Event, _> = serde_json::from_value(json!({"event": "create"}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("create event is missing its value"), "{err}");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Event, _> =
            serde_json::from_value(json!({"event": "rename", "value": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn liveness_follows_value() {
        assert!(Event::Create("a".to_string()).is_live());
        assert!(Event::Update("b".to_string()).is_live());
        assert!(!Event::Delete.is_live());
        assert!(!Event::Create(String::new()).is_live());
    }
}
