//! Client configuration

use crate::error::{ApiError, Result};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("stackport/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings shared by every request a [`Client`](crate::Client) issues
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/3` (no trailing slash)
    pub base_url: String,
    /// Bearer token attached to every request
    pub access_token: Option<String>,
    pub user_agent: String,
    /// Per-request timeout applied by the HTTP transport
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            access_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// - `STACKPORT_API_URL` (required)
    /// - `STACKPORT_ACCESS_TOKEN`
    /// - `STACKPORT_USER_AGENT`
    /// - `STACKPORT_REQUEST_TIMEOUT_MS` (default: 30000)
    pub fn from_env() -> Result<Self> {
        let base_url = non_empty_env("STACKPORT_API_URL")
            .ok_or_else(|| ApiError::Config("STACKPORT_API_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);

        if let Some(token) = non_empty_env("STACKPORT_ACCESS_TOKEN") {
            config = config.with_access_token(token);
        }
        if let Some(ua) = non_empty_env("STACKPORT_USER_AGENT") {
            config = config.with_user_agent(ua);
        }
        if let Some(ms) = non_empty_env("STACKPORT_REQUEST_TIMEOUT_MS") {
            let ms: u64 = ms.parse().map_err(|e| {
                ApiError::Config(format!("invalid STACKPORT_REQUEST_TIMEOUT_MS: {}", e))
            })?;
            config = config.with_request_timeout(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject configurations that could never produce a valid request
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::Config("base URL is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ApiError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Join an API path onto the base URL
    pub(crate) fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
