//! Client configuration.
//!
//! Holds the API token, the base origin and an optional call timeout.
//! `from_env` reads:
//!
//! - `TODOIST_API_TOKEN` (required)
//! - `TODOIST_API_URL` (optional, defaults to `https://api.todoist.com/rest`)
//! - `TODOIST_TIMEOUT_SECS` (optional, whole seconds)

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::{ApiError, Result};

/// Default Todoist REST origin. Resource paths carry the `/v1` prefix.
pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest";

pub const ENV_TOKEN: &str = "TODOIST_API_TOKEN";
pub const ENV_BASE_URL: &str = "TODOIST_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TODOIST_TIMEOUT_SECS";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_TOKEN} is not set")))?;

        let mut config = Self::new(token);

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(&url);
            }
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = normalize_base_url(url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Keep the token out of debug output and logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Strip trailing slashes and warn on plain-HTTP origins other than loopback.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!(url, "base URL does not use HTTPS");
    }

    url.to_string()
}
