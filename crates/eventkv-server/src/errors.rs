use crate::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while reading or writing HTTP messages.
#[derive(Error, Debug)]
pub enum HttpError {
    /// I/O error on the connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Peer closed the connection before sending a request.
    #[error("connection closed before a request was received")]
    Closed,
    /// Request line or headers are not valid HTTP/1.1.
    #[error("malformed request: {0}")]
    Malformed(String),
    /// Request line and headers exceed the head size limit.
    #[error("request head exceeds {max} bytes")]
    HeadTooLarge {
        /// Maximum head size.
        max: usize,
    },
    /// Declared body exceeds the configured limit.
    #[error("request body size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Declared body size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },
    /// Request uses a transfer coding other than identity.
    #[error("unsupported transfer encoding: {0}")]
    UnsupportedTransferEncoding(String),
}

impl HttpError {
    /// Status to answer with, or `None` if no response can be sent.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Io(_) | HttpError::Closed => None,
            HttpError::Malformed(_) => Some(StatusCode::BAD_REQUEST),
            HttpError::HeadTooLarge { .. } => Some(StatusCode::HEADER_FIELDS_TOO_LARGE),
            HttpError::PayloadTooLarge { .. } => Some(StatusCode::PAYLOAD_TOO_LARGE),
            HttpError::UnsupportedTransferEncoding(_) => Some(StatusCode::NOT_IMPLEMENTED),
        }
    }
}
