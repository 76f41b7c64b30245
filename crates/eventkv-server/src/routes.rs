use crate::http::Method;
use thiserror::Error;

/// Path segment all routes live under.
pub const API_ROOT: &str = "api";

/// Path segment selecting a key's history.
pub const HISTORY_SEGMENT: &str = "history";

/// Operation selected by a method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `POST /api`
    Create,
    /// `GET /api/{key}`
    Read(String),
    /// `PUT|PATCH /api/{key}`
    Update(String),
    /// `DELETE /api/{key}`
    Delete(String),
    /// `GET /api/{key}/history`
    History(String),
}

/// Reasons a request cannot be routed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// Path does not match any route shape.
    #[error("no route for path")]
    NotFound,
    /// Path matches a route but not with this method.
    #[error("method not allowed on this path")]
    MethodNotAllowed,
    /// Path contains an invalid percent-encoding.
    #[error("path is not validly percent-encoded")]
    BadEncoding,
}

/// Maps a method and request target to an [`Action`].
///
/// The query string is ignored. The path is percent-decoded, then one
/// leading and one trailing `/` are trimmed and the rest is split on `/`:
///
/// - `api` → collection (POST)
/// - `api/{key}` → key (GET, PUT, PATCH, DELETE)
/// - `api/{key}/history` → history (GET)
///
/// Any other shape, or an empty key, is [`RouteError::NotFound`].
pub fn route(method: &Method, target: &str) -> Result<Action, RouteError> {
    let path = target.split_once('?').map_or(target, |(path, _)| path);
    let path = percent_decode(path)?;
    let path = path.strip_prefix('/').unwrap_or(&path);
    let path = path.strip_suffix('/').unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [root] if *root == API_ROOT => match method {
            Method::Post => Ok(Action::Create),
            _ => Err(RouteError::MethodNotAllowed),
        },
        [root, key] if *root == API_ROOT && !key.is_empty() => {
            let key = key.to_string();
            match method {
                Method::Get => Ok(Action::Read(key)),
                Method::Put | Method::Patch => Ok(Action::Update(key)),
                Method::Delete => Ok(Action::Delete(key)),
                _ => Err(RouteError::MethodNotAllowed),
            }
        }
        [root, key, history]
            if *root == API_ROOT && !key.is_empty() && *history == HISTORY_SEGMENT =>
        {
            match method {
                Method::Get => Ok(Action::History(key.to_string())),
                _ => Err(RouteError::MethodNotAllowed),
            }
        }
        _ => Err(RouteError::NotFound),
    }
}

fn percent_decode(path: &str) -> Result<String, RouteError> {
    if !path.contains('%') {
        return Ok(path.to_string());
    }

    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let (high, low) = match bytes.get(i + 1..i + 3) {
                Some(&[high, low]) => (hex_value(high)?, hex_value(low)?),
                _ => return Err(RouteError::BadEncoding),
            };
            decoded.push(high << 4 | low);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).map_err(|_| RouteError::BadEncoding)
}

fn hex_value(byte: u8) -> Result<u8, RouteError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(RouteError::BadEncoding),
    }
}
