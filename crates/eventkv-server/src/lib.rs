//! HTTP interface for eventkv.
//!
//! This crate provides:
//! - A minimal HTTP/1.1 codec ([`read_request`], [`write_response`])
//! - The request mapper that turns a method and path under `/api` into an
//!   [`Action`]
//! - [`handle`], which runs an action against a
//!   [`KvService`](eventkv_store::KvService) and maps the outcome to a status
//!   code, content type and body
//! - [`Server`], the tokio accept loop
//!
//! ## Routes
//!
//! | Path | Verb | Success |
//! |---|---|---|
//! | `/api`, `/api/` | POST `{"key":"value"}` as `application/json` | 201 |
//! | `/api/{key}` | GET | 200 with the value, 204 if deleted |
//! | `/api/{key}` | PUT, PATCH raw value as `text/plain` | 204 |
//! | `/api/{key}` | DELETE | 204 |
//! | `/api/{key}/history` | GET | 200 with a JSON array of events |
//!
//! Other paths are 404 and other verbs on known paths are 405, both with an
//! empty body.

#![deny(missing_docs)]

/// Error types for the HTTP layer.
pub mod errors;
/// Action handling and response mapping.
pub mod handler;
/// HTTP/1.1 request and response codec.
pub mod http;
/// Path and verb routing.
pub mod routes;
/// Listener loop.
pub mod server;

pub use errors::HttpError;
pub use handler::handle;
pub use http::{read_request, write_response, Method, Request, Response, StatusCode};
pub use routes::{route, Action, RouteError};
pub use server::{Server, ServerConfig};
