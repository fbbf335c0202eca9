//! Request construction
//!
//! An [`ApiRequest`] is a fully resolved wire call: absolute URL, query
//! string, serialized JSON body and auth context. Building one never touches
//! the network.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::Serialize;
use std::borrow::Cow;

/// Percent-encode one URL path segment (`A#B` becomes `A%23B`)
pub(crate) fn encode_segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

/// A request ready to be handed to a [`Transport`](crate::Transport)
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
    pub bearer_token: Option<String>,
    pub user_agent: String,
}

impl ApiRequest {
    /// Build a request bound to `config`'s base URL and credentials
    pub fn build<B>(
        config: &ClientConfig,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::RequestConstruction(format!("{} {}: {}", method, path, e)))?;

        Ok(Self {
            url: config.url_for(path),
            method,
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            body,
            bearer_token: config.access_token.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed back as JSON, if any
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    /// `METHOD url`, used in log lines and error messages
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("abc-123_x.y"), "abc-123_x.y");
        assert_eq!(encode_segment("A#B"), "A%23B");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
    }
    use std::collections::HashMap;

    fn config() -> ClientConfig {
        ClientConfig::new("https://api.example.com/3").with_access_token("secret")
    }

    #[test]
    fn test_build_get_with_query() {
        let req = ApiRequest::build(
            &config(),
            Method::GET,
            "/stacks.json",
            None::<&()>,
            &[("page", "2".to_string())],
        )
        .unwrap();

        assert_eq!(req.url, "https://api.example.com/3/stacks.json");
        assert_eq!(req.query_param("page"), Some("2"));
        assert!(req.body.is_none());
        assert_eq!(req.bearer_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_build_serializes_body() {
        let body = serde_json::json!({"command": "restart"});
        let req = ApiRequest::build(
            &config(),
            Method::POST,
            "/stacks/abc/actions.json",
            Some(&body),
            &[],
        )
        .unwrap();

        assert_eq!(req.json_body(), Some(body));
        assert_eq!(req.describe(), "POST https://api.example.com/3/stacks/abc/actions.json");
    }

    #[test]
    fn test_unserializable_body_is_construction_error() {
        let mut body: HashMap<(i32, i32), i32> = HashMap::new();
        body.insert((1, 2), 3);

        let err = ApiRequest::build(&config(), Method::POST, "/x", Some(&body), &[]).unwrap_err();
        assert!(matches!(err, ApiError::RequestConstruction(_)));
    }
}
