use crate::http::{Request, Response, StatusCode};
use crate::routes::{route, Action, RouteError};
use eventkv_core::{CoreError, CreateRequest};
use eventkv_store::{DocumentStore, KvService, ReadOutcome, ServiceError};
use tracing::{error, warn};

/// Content type of value and status responses.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";
/// Content type of create requests and history responses.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Prefix of every 500 response body.
pub const ERROR_UNEXPECTED: &str = "Unexpected error:";
/// Body for updates and deletes on a deleted key.
pub const ERROR_KEY_DELETED: &str = "Error: the specified key has been deleted";
/// Body for creates on a live key.
pub const ERROR_KEY_EXISTS: &str = "Error: the specified key already exists";
/// Body for operations on a key that was never created.
pub const ERROR_KEY_NOT_FOUND: &str = "Error: the specified key does not exist";
/// Body for rejected update requests.
pub const ERROR_INVALID_PUT_BODY: &str =
    "Error: request body must be a single value with Content-Type text/plain";
/// Body for rejected create requests.
pub const ERROR_INVALID_POST_BODY: &str =
    "Error: request body must be of the form {\"key\":\"value\"} with Content-Type application/json";

/// Routes `request` and runs it against `service`.
///
/// Routing failures answer 404 or 405 with no body. Everything else answers
/// with a plain-text body (JSON for history) chosen from the outcome.
pub fn handle<S: DocumentStore>(service: &KvService<S>, request: &Request) -> Response {
    let action = match route(&request.method, &request.target) {
        Ok(action) => action,
        Err(RouteError::NotFound) => return Response::empty(StatusCode::NOT_FOUND),
        Err(RouteError::MethodNotAllowed) => {
            return Response::empty(StatusCode::METHOD_NOT_ALLOWED)
        }
        Err(RouteError::BadEncoding) => return Response::empty(StatusCode::BAD_REQUEST),
    };

    match action {
        Action::Create => create(service, request),
        Action::Read(key) => read(service, &key),
        Action::Update(key) => update(service, request, &key),
        Action::Delete(key) => delete(service, &key),
        Action::History(key) => history(service, &key),
    }
}

fn create<S: DocumentStore>(service: &KvService<S>, request: &Request) -> Response {
    if !request.has_media_type(CONTENT_TYPE_JSON) {
        return text(StatusCode::UNSUPPORTED_MEDIA_TYPE, ERROR_INVALID_POST_BODY);
    }
    let create = match CreateRequest::from_json(&request.body) {
        Ok(create) => create,
        Err(err) => return failure(err.into(), CONTENT_TYPE_TEXT),
    };
    match service.create(&create) {
        Ok(()) => text(StatusCode::CREATED, ""),
        Err(err) => failure(err, CONTENT_TYPE_TEXT),
    }
}

fn read<S: DocumentStore>(service: &KvService<S>, key: &str) -> Response {
    match service.read(key) {
        Ok(ReadOutcome::Live(value)) => text(StatusCode::OK, value),
        Ok(ReadOutcome::Deleted) => text(StatusCode::NO_CONTENT, ""),
        Err(err) => failure(err, CONTENT_TYPE_TEXT),
    }
}

fn update<S: DocumentStore>(service: &KvService<S>, request: &Request, key: &str) -> Response {
    if !request.has_media_type(CONTENT_TYPE_TEXT) {
        return text(StatusCode::UNSUPPORTED_MEDIA_TYPE, ERROR_INVALID_PUT_BODY);
    }
    let value = match std::str::from_utf8(&request.body) {
        Ok(value) if !value.is_empty() => value,
        _ => return text(StatusCode::BAD_REQUEST, ERROR_INVALID_PUT_BODY),
    };
    match service.update(key, value) {
        Ok(()) => text(StatusCode::NO_CONTENT, ""),
        Err(err) => failure(err, CONTENT_TYPE_TEXT),
    }
}

fn delete<S: DocumentStore>(service: &KvService<S>, key: &str) -> Response {
    match service.delete(key) {
        Ok(()) => text(StatusCode::NO_CONTENT, ""),
        Err(err) => failure(err, CONTENT_TYPE_TEXT),
    }
}

fn history<S: DocumentStore>(service: &KvService<S>, key: &str) -> Response {
    let events = match service.history(key) {
        Ok(events) => events,
        Err(err) => return failure(err, CONTENT_TYPE_JSON),
    };
    match serde_json::to_vec(&events) {
        Ok(body) => Response::with_body(StatusCode::OK, CONTENT_TYPE_JSON, body),
        Err(err) => unexpected(&err, CONTENT_TYPE_JSON),
    }
}

fn text(status: StatusCode, body: impl Into<Vec<u8>>) -> Response {
    Response::with_body(status, CONTENT_TYPE_TEXT, body)
}

fn failure(err: ServiceError, content_type: &'static str) -> Response {
    let (status, body) = match &err {
        ServiceError::Rejected(CoreError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, ERROR_KEY_NOT_FOUND)
        }
        ServiceError::Rejected(CoreError::KeyExists { .. }) => {
            (StatusCode::BAD_REQUEST, ERROR_KEY_EXISTS)
        }
        ServiceError::Rejected(CoreError::KeyDeleted { .. }) => {
            (StatusCode::BAD_REQUEST, ERROR_KEY_DELETED)
        }
        ServiceError::Rejected(CoreError::InvalidBody) => {
            (StatusCode::BAD_REQUEST, ERROR_INVALID_POST_BODY)
        }
        ServiceError::Rejected(CoreError::InvalidValue) => {
            (StatusCode::BAD_REQUEST, ERROR_INVALID_PUT_BODY)
        }
        ServiceError::Rejected(CoreError::EmptyRecord { .. }) | ServiceError::Store(_) => {
            return unexpected(&err, content_type)
        }
    };
    warn!(status = status.as_u16(), error = %err, "request rejected");
    Response::with_body(status, content_type, body)
}

fn unexpected(err: &dyn std::error::Error, content_type: &'static str) -> Response {
    error!(error = %err, "request failed");
    Response::with_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        content_type,
        format!("{ERROR_UNEXPECTED} {err}"),
    )
}
