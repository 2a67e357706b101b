//! Error types for the Todoist client.
//!
//! # Design
//! Three failure categories stay distinct so callers can branch on them:
//! the call never completed (`Transport`), the server answered with a
//! non-2xx status (`Request`), or a 2xx body did not match the expected
//! shape (`Deserialization`). Status codes are not pre-interpreted: a 404 is
//! a `Request` with `status == 404`, and the raw body is kept as bytes
//! because error bodies are not guaranteed to be JSON.

use std::borrow::Cow;

use thiserror::Error;

/// Failure below the HTTP layer: no response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call was aborted by a deadline or cancellation before completing.
    #[error("request did not complete: timed out")]
    Timeout,

    /// DNS failure, refused connection, TLS failure and similar.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body was larger than the transport's limit. Carries the
    /// limit in bytes.
    #[error("response body exceeds the {0}-byte limit")]
    BodyTooLarge(u64),

    /// Reading the response body failed after the status line arrived.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by `TodoistClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a status outside 200-299.
    #[error("request error: {status}")]
    Request { status: u16, body: Vec<u8> },

    /// A 2xx body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status of a `Request` error; `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw error body of a `Request` error, decoded lossily as UTF-8.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ApiError::Request { body, .. } => Some(String::from_utf8_lossy(body)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_display_carries_status() {
        let err = ApiError::Request {
            status: 404,
            body: b"not found".to_vec(),
        };
        assert_eq!(err.to_string(), "request error: 404");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body_text().as_deref(), Some("not found"));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::from(TransportError::Timeout);
        assert_eq!(err.status(), None);
        assert!(err.body_text().is_none());
        assert_eq!(err.to_string(), "request did not complete: timed out");
    }

    #[test]
    fn non_utf8_body_is_decoded_lossily() {
        let err = ApiError::Request {
            status: 500,
            body: vec![0xff, b'o', b'k'],
        };
        assert_eq!(err.body_text().as_deref(), Some("\u{fffd}ok"));
    }
}
