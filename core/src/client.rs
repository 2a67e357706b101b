//! Shared request/response pipeline for every Todoist resource.
//!
//! # Design
//! `TodoistClient` holds only immutable state: the configuration (token and
//! base URL) and a `Transport`. Each operation runs the same steps:
//!
//! 1. `build_request` joins base URL, `/v1` prefix, resource path and query,
//!    and attaches `Authorization`, `Content-Type` (only with a body) and
//!    `X-Request-Id` (only when the caller supplied one);
//! 2. the transport performs exactly one round trip;
//! 3. `parse_json` / `parse_empty` classify the response: any non-2xx becomes
//!    `ApiError::Request` with the raw body, 2xx either decodes or, for void
//!    operations, returns `()` without looking at the body.
//!
//! Build and parse are pure and public so a host can inspect requests or run
//! its own I/O between them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::Query;
use crate::transport::{Transport, UreqTransport};

/// Version prefix for every resource path.
pub const API_VERSION_PREFIX: &str = "/v1";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

/// Client for the Todoist REST API.
///
/// Stateless between calls and `Send + Sync` whenever the transport is, so a
/// single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct TodoistClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl TodoistClient<UreqTransport> {
    /// Client for the public API origin using the default `ureq` transport.
    pub fn new(token: &str) -> Self {
        Self::from_config(ClientConfig::new(token))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }

    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(ClientConfig::from_env()?))
    }
}

impl<T: Transport> TodoistClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the wire request for `path` (already starting with `/`, without
    /// the version prefix). `body` must be pre-encoded JSON; see
    /// [`encode_body`].
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<String>,
        request_id: Option<&str>,
    ) -> HttpRequest {
        let mut url = format!("{}{}{}", self.config.base_url(), API_VERSION_PREFIX, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }

        let mut headers = vec![(
            HEADER_AUTHORIZATION.to_string(),
            format!("Bearer {}", self.config.token),
        )];
        if body.is_some() {
            headers.push((HEADER_CONTENT_TYPE.to_string(), "application/json".to_string()));
        }
        if let Some(id) = request_id {
            headers.push((HEADER_REQUEST_ID.to_string(), id.to_string()));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Send a prepared request. Only transport failures are errors here;
    /// status classification happens in the `parse_*` functions.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<R> {
        let request = self.build_request(HttpMethod::Get, path, query, None, None);
        parse_json(self.execute(&request)?)
    }

    pub(crate) fn post<B, R>(&self, path: &str, body: &B, request_id: Option<&str>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let request = self.build_request(HttpMethod::Post, path, &Query::new(), Some(body), request_id);
        parse_json(self.execute(&request)?)
    }

    /// POST whose success response carries no value.
    pub(crate) fn post_void<B>(&self, path: &str, body: &B, request_id: Option<&str>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let request = self.build_request(HttpMethod::Post, path, &Query::new(), Some(body), request_id);
        parse_empty(self.execute(&request)?)
    }

    /// Bodiless POST, used for state transitions such as close/reopen.
    pub(crate) fn post_action(&self, path: &str, request_id: Option<&str>) -> Result<()> {
        let request = self.build_request(HttpMethod::Post, path, &Query::new(), None, request_id);
        parse_empty(self.execute(&request)?)
    }

    pub(crate) fn delete(&self, path: &str, request_id: Option<&str>) -> Result<()> {
        let request = self.build_request(HttpMethod::Delete, path, &Query::new(), None, request_id);
        parse_empty(self.execute(&request)?)
    }
}

/// Serialize a request payload to its JSON text.
pub fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(ApiError::Serialization)
}

/// Classify `response` and decode a 2xx body into `R`.
pub fn parse_json<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    let response = check_status(response)?;
    serde_json::from_slice(&response.body).map_err(ApiError::Deserialization)
}

/// Classify `response` for operations that return no value. The body of a
/// 2xx response is ignored, never decoded.
pub fn parse_empty(response: HttpResponse) -> Result<()> {
    check_status(response).map(|_| ())
}

fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    warn!(status = response.status, body = %response.body_text(), "request failed");
    Err(ApiError::Request {
        status: response.status,
        body: response.body,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use serde::Deserialize;

    use super::*;
    use crate::error::TransportError;
    use crate::transport::ScriptedTransport;

    pub(crate) const BASE_URL: &str = "https://api.todoist.com/rest";

    /// Client wired to a shared scripted transport the test can inspect.
    pub(crate) fn scripted(
        transport: ScriptedTransport,
    ) -> (TodoistClient<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let client = TodoistClient::with_transport(ClientConfig::new("TOKEN"), Arc::clone(&transport));
        (client, transport)
    }

    pub(crate) fn body_json(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().expect("request has no body")).unwrap()
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: u64,
    }

    #[test]
    fn build_request_without_body_sets_only_auth() {
        let (client, _) = scripted(ScriptedTransport::new());
        let req = client.build_request(HttpMethod::Get, "/tasks", &Query::new(), None, None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE_URL}/v1/tasks"));
        assert_eq!(req.headers, vec![("Authorization".to_string(), "Bearer TOKEN".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_request_with_body_and_request_id() {
        let (client, _) = scripted(ScriptedTransport::new());
        let req = client.build_request(
            HttpMethod::Post,
            "/labels",
            &Query::new(),
            Some(r#"{"name":"x"}"#.to_string()),
            Some("req-1"),
        );
        assert_eq!(
            req.headers,
            vec![
                ("Authorization".to_string(), "Bearer TOKEN".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Request-Id".to_string(), "req-1".to_string()),
            ]
        );
    }

    #[test]
    fn build_request_appends_encoded_query() {
        let (client, _) = scripted(ScriptedTransport::new());
        let mut query = Query::new();
        query.push("project_id", 5).push("label_id", 3);
        let req = client.build_request(HttpMethod::Get, "/tasks", &query, None, None);
        assert_eq!(req.url, format!("{BASE_URL}/v1/tasks?label_id=3&project_id=5"));
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let config = ClientConfig::new("TOKEN").with_base_url("http://localhost:3000/");
        let client = TodoistClient::with_transport(config, ScriptedTransport::new());
        let req = client.build_request(HttpMethod::Get, "/labels", &Query::new(), None, None);
        assert_eq!(req.url, "http://localhost:3000/v1/labels");
    }

    #[test]
    fn parse_json_decodes_success() {
        let thing: Thing = parse_json(HttpResponse::new(200, r#"{"id":7}"#)).unwrap();
        assert_eq!(thing, Thing { id: 7 });
    }

    #[test]
    fn parse_json_bad_body_is_deserialization_error() {
        let err = parse_json::<Thing>(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_json_empty_success_body_is_deserialization_error() {
        let err = parse_json::<Thing>(HttpResponse::new(204, "")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn non_success_keeps_status_and_raw_body() {
        for status in [301u16, 400, 401, 403, 404, 429, 500, 503] {
            let err = parse_json::<Thing>(HttpResponse::new(status, r#"{"id":1}"#)).unwrap_err();
            match err {
                ApiError::Request { status: got, body } => {
                    assert_eq!(got, status);
                    assert_eq!(body, br#"{"id":1}"#);
                }
                other => panic!("expected Request error, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_empty_never_decodes() {
        assert!(parse_empty(HttpResponse::new(204, "")).is_ok());
        assert!(parse_empty(HttpResponse::new(200, "garbage")).is_ok());
    }

    #[test]
    fn parse_empty_error_body_is_not_parsed() {
        let err = parse_empty(HttpResponse::new(404, "\"not found\"")).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body_text().as_deref(), Some("\"not found\""));
    }

    #[test]
    fn transport_failure_is_distinct_from_http_error() {
        let (client, _) = scripted(ScriptedTransport::new().fail(TransportError::Timeout));
        let err = client.get::<Thing>("/tasks/1", &Query::new()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn each_call_is_exactly_one_round_trip() {
        let (client, transport) = scripted(ScriptedTransport::new().respond(500, "boom"));
        let _ = client.delete("/tasks/1", None);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TodoistClient>();
        assert_send_sync::<TodoistClient<Arc<ScriptedTransport>>>();
    }
}
