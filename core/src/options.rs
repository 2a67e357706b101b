//! Options shared by every mutating call that has no payload of its own.

use uuid::Uuid;

/// Options for delete, close and reopen calls, and for updates whose only
/// body field is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Sent as `X-Request-Id` so the server can deduplicate retried calls.
    pub request_id: Option<String>,
}

impl RequestOptions {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }
}

/// A fresh random idempotency token. Generating and reusing it across
/// retries is up to the caller.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_request_id() {
        assert_eq!(RequestOptions::default().request_id, None);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = new_request_id();
        let b = new_request_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
