use serde_json::Value;

use crate::document::Document;
use crate::errors::CoreError;

/// A parsed create request: exactly one key and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Key to create.
    pub key: String,
    /// Initial value.
    pub value: String,
}

impl CreateRequest {
    /// Parses a `{"key":"value"}` body.
    ///
    /// The body must be a JSON object with exactly one entry whose key and
    /// string value are both non-empty. Anything else (malformed JSON, a
    /// non-object, zero or several entries, a non-string value) is
    /// [`CoreError::InvalidBody`].
    pub fn from_json(body: &[u8]) -> Result<Self, CoreError> {
        let parsed: Value = serde_json::from_slice(body).map_err(|_| CoreError::InvalidBody)?;
        let Value::Object(entries) = parsed else {
            return Err(CoreError::InvalidBody);
        };
        if entries.len() != 1 {
            return Err(CoreError::InvalidBody);
        }
        match entries.into_iter().next() {
            Some((key, Value::String(value))) if !key.is_empty() && !value.is_empty() => {
                Ok(Self { key, value })
            }
            _ => Err(CoreError::InvalidBody),
        }
    }

    /// Applies the request to `doc`.
    pub fn apply(&self, doc: &mut Document) -> Result<(), CoreError> {
        doc.create(&self.key, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_pair() {
        let request = CreateRequest::from_json(br#"{"key3":"value3"}"#).unwrap();
        assert_eq!(request.key, "key3");
        assert_eq!(request.value, "value3");
    }

    #[test]
    fn rejects_bad_shapes() {
        for body in [
            &b""[..],
            b"key3",
            b"[]",
            b"\"key3\"",
            b"{}",
            br#"{"a":"1","b":"2"}"#,
            br#"{"a":1}"#,
            br#"{"a":null}"#,
            br#"{"a":""}"#,
            br#"{"":"v"}"#,
        ] {
            assert_eq!(
                CreateRequest::from_json(body),
                Err(CoreError::InvalidBody),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
