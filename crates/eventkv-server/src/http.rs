use crate::errors::HttpError;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum size of the request line plus headers: 64 KiB.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Default maximum request body size: 16 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// Any other method token.
    Other(String),
}

impl Method {
    /// Parses a method token. Methods are case-sensitive.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }

    /// Returns the method token.
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200
    pub const OK: StatusCode = StatusCode(200);
    /// 201
    pub const CREATED: StatusCode = StatusCode(201);
    /// 204
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    /// 400
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 413
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    /// 415
    pub const UNSUPPORTED_MEDIA_TYPE: StatusCode = StatusCode(415);
    /// 431
    pub const HEADER_FIELDS_TOO_LARGE: StatusCode = StatusCode(431);
    /// 500
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    /// 501
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);

    /// Returns the numeric code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the canonical reason phrase.
    pub fn reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            415 => "Unsupported Media Type",
            431 => "Request Header Fields Too Large",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason())
    }
}

/// A fully read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Request target as sent, including any query string.
    pub target: String,
    /// Raw `Content-Type` header value, if present.
    pub content_type: Option<String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a request with no content type and an empty body.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Sets the `Content-Type` header.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns true if the content type's media type is `expected`.
    ///
    /// Comparison is case-insensitive and ignores parameters such as
    /// `charset`.
    pub fn has_media_type(&self, expected: &str) -> bool {
        self.content_type
            .as_deref()
            .and_then(|value| value.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }
}

/// A response to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: StatusCode,
    /// `Content-Type` header value, if any.
    pub content_type: Option<&'static str>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// A response with no content type and no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// A response with the given content type and body.
    pub fn with_body(
        status: StatusCode,
        content_type: &'static str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.into(),
        }
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Reads one request from `reader`.
///
/// The body is framed by `Content-Length`; a missing header means an empty
/// body. Chunked transfer coding is not supported.
///
/// # Errors
///
/// Returns [`HttpError`] if:
/// - The peer closes the connection before sending anything ([`HttpError::Closed`])
/// - The request line or a header is malformed
/// - The head exceeds [`MAX_HEAD_SIZE`]
/// - The declared body exceeds `max_body`
/// - I/O error occurs
pub async fn read_request<R>(reader: &mut R, max_body: usize) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = (&mut *reader).take(MAX_HEAD_SIZE as u64);
    let mut request_line: Option<String> = None;
    let mut content_type = None;
    let mut content_length: usize = 0;

    loop {
        let mut raw = Vec::new();
        let read = head.read_until(b'\n', &mut raw).await?;
        if read == 0 || raw.last() != Some(&b'\n') {
            if head.limit() == 0 {
                return Err(HttpError::HeadTooLarge { max: MAX_HEAD_SIZE });
            }
            if request_line.is_none() && raw.is_empty() {
                return Err(HttpError::Closed);
            }
            return Err(HttpError::Malformed("unexpected end of request head".to_string()));
        }

        let line = std::str::from_utf8(&raw)
            .map_err(|_| HttpError::Malformed("request head is not UTF-8".to_string()))?
            .trim_end_matches(&['\r', '\n'][..]);

        if request_line.is_none() {
            // Tolerate empty lines before the request line.
            if !line.is_empty() {
                request_line = Some(line.to_string());
            }
            continue;
        }

        if line.is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("invalid header line: {line:?}")))?;
        let value = value.trim();

        if name.eq_ignore_ascii_case("content-length") {
            content_length = value
                .parse()
                .map_err(|_| HttpError::Malformed(format!("invalid content length: {value:?}")))?;
        } else if name.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && !value.eq_ignore_ascii_case("identity")
        {
            return Err(HttpError::UnsupportedTransferEncoding(value.to_string()));
        }
    }

    let request_line = request_line.unwrap_or_default();
    let (method, target) = parse_request_line(&request_line)?;

    if content_length > max_body {
        return Err(HttpError::PayloadTooLarge {
            size: content_length,
            max: max_body,
        });
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HttpError::Malformed("truncated request body".to_string())
        } else {
            HttpError::Io(e)
        }
    })?;

    Ok(Request {
        method,
        target,
        content_type,
        body,
    })
}

fn parse_request_line(line: &str) -> Result<(Method, String), HttpError> {
    let mut parts = line.split(' ');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None)
            if !method.is_empty() && target.starts_with('/') && version.starts_with("HTTP/1.") =>
        {
            Ok((Method::from_token(method), target.to_string()))
        }
        _ => Err(HttpError::Malformed(format!("invalid request line: {line:?}"))),
    }
}

/// Writes `response` to `writer` and flushes it.
///
/// Every response carries `Connection: close`. `Content-Length` is omitted
/// for 204 responses, which never carry a body.
pub async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), HttpError>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!("HTTP/1.1 {}\r\n", response.status);
    if let Some(content_type) = response.content_type {
        head.push_str(&format!("Content-Type: {content_type}\r\n"));
    }
    let no_content = response.status == StatusCode::NO_CONTENT;
    if !no_content {
        head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    writer.write_all(head.as_bytes()).await?;
    if !no_content {
        writer.write_all(&response.body).await?;
    }
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(raw: &[u8]) -> Result<Request, HttpError> {
        let mut reader = raw;
        read_request(&mut reader, 64).await
    }

    #[tokio::test]
    async fn reads_request_with_body() {
        let request = parse(
            b"PUT /api/key1 HTTP/1.1\r\nHost: x\r\nContent-Type: text/plain\r\nContent-Length: 6\r\n\r\nvalue4",
        )
        .await
        .unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.target, "/api/key1");
        assert_eq!(request.content_type.as_deref(), Some("text/plain"));
        assert_eq!(request.body, b"value4");
    }

    #[tokio::test]
    async fn missing_content_length_means_empty_body() {
        let request = parse(b"GET /api/key1 HTTP/1.1\n\n").await.unwrap();
        assert_eq!(request.method, Method::Get);
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn empty_input_is_closed() {
        assert!(matches!(parse(b"").await, Err(HttpError::Closed)));
    }

    #[tokio::test]
    async fn rejects_bad_request_line() {
        let err = parse(b"GET\r\n\r\n").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        let err = parse(b"GET api HTTP/1.1\r\n\r\n").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let err = parse(b"POST /api HTTP/1.1\r\nContent-Length: 65\r\n\r\n")
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::PayloadTooLarge { size: 65, max: 64 }));
        assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));
    }

    #[tokio::test]
    async fn rejects_truncated_body() {
        let err = parse(b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc")
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Malformed(_)));
    }

    #[tokio::test]
    async fn rejects_chunked_body() {
        let err = parse(b"POST /api HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_IMPLEMENTED));
    }

    #[tokio::test]
    async fn writes_response() {
        let mut out = Vec::new();
        let response = Response::with_body(StatusCode::OK, "text/plain", "value1");
        write_response(&mut out, &response).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 6\r\nConnection: close\r\n\r\nvalue1"
        );
    }

    #[tokio::test]
    async fn no_content_has_no_length() {
        let mut out = Vec::new();
        let response = Response::with_body(StatusCode::NO_CONTENT, "text/plain", "");
        write_response(&mut out, &response).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.1 204 No Content\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn media_type_ignores_parameters() {
        let request = Request::new(Method::Put, "/api/k").with_content_type("Text/Plain; charset=utf-8");
        assert!(request.has_media_type("text/plain"));
        assert!(!request.has_media_type("application/json"));
        assert!(!Request::new(Method::Put, "/api/k").has_media_type("text/plain"));
    }
}
