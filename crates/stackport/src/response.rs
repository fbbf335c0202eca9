//! Response decoding and the pagination cursor
//!
//! Every payload arrives wrapped in the same envelope:
//!
//! ```text
//! {
//!   "response": <payload>,
//!   "count": 2,
//!   "pagination": { "previous": null, "current": 1, "next": 2, "per_page": 30, "pages": 2 }
//! }
//! ```
//!
//! `pagination` is only present on collection endpoints.

use crate::error::{ApiError, Result};
use crate::request::ApiRequest;
use crate::transport::RawResponse;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Current/next page indicators returned with a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub current: u32,
    pub next: u32,
}

impl Pagination {
    /// Another page exists only when the server moves `next` past `current`
    pub fn has_more(&self) -> bool {
        self.next > self.current
    }
}

impl<'de> Deserialize<'de> for Pagination {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            current: Option<u32>,
            #[serde(default)]
            next: Option<u32>,
        }

        let wire = Wire::deserialize(deserializer)?;
        let current = wire.current.unwrap_or(1);
        // null `next` marks the last page
        let next = wire.next.unwrap_or(current);
        Ok(Pagination { current, next })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// A decoded payload together with its pagination cursor, if any
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub pagination: Option<Pagination>,
}

/// Turn a raw response into a typed payload.
///
/// Non-success statuses become [`ApiError::Http`] with the server's message;
/// anything that does not match the envelope becomes [`ApiError::Decode`].
pub fn decode<T: DeserializeOwned>(request: &ApiRequest, raw: &RawResponse) -> Result<Decoded<T>> {
    if !raw.is_success() {
        return Err(ApiError::Http {
            method: request.method.to_string(),
            url: request.url.clone(),
            status: raw.status,
            message: error_message(raw),
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(&raw.body).map_err(|source| ApiError::Decode {
            url: request.url.clone(),
            source,
        })?;

    Ok(Decoded {
        value: envelope.response,
        pagination: envelope.pagination,
    })
}

fn error_message(raw: &RawResponse) -> String {
    match serde_json::from_slice::<ErrorBody>(&raw.body) {
        Ok(ErrorBody {
            error_description: Some(desc),
            ..
        }) => desc,
        Ok(ErrorBody {
            error: Some(err), ..
        }) => err,
        _ => {
            let text = raw.text();
            if text.trim().is_empty() {
                "empty response body".to_string()
            } else {
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use reqwest::Method;

    fn get_request() -> ApiRequest {
        ApiRequest::build(
            &ClientConfig::new("https://api.example.com"),
            Method::GET,
            "/stacks.json",
            None::<&()>,
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_decode_list_with_pagination() {
        let raw = RawResponse::new(
            200,
            r#"{"response":[1,2,3],"count":3,"pagination":{"previous":null,"current":1,"next":2,"per_page":3,"pages":2}}"#,
        );
        let decoded: Decoded<Vec<u32>> = decode(&get_request(), &raw).unwrap();
        assert_eq!(decoded.value, vec![1, 2, 3]);
        assert_eq!(
            decoded.pagination,
            Some(Pagination {
                current: 1,
                next: 2
            })
        );
        assert!(decoded.pagination.unwrap().has_more());
    }

    #[test]
    fn test_null_next_means_last_page() {
        let raw = RawResponse::new(
            200,
            r#"{"response":[],"pagination":{"current":4,"next":null}}"#,
        );
        let decoded: Decoded<Vec<u32>> = decode(&get_request(), &raw).unwrap();
        let cursor = decoded.pagination.unwrap();
        assert_eq!(cursor.next, 4);
        assert!(!cursor.has_more());
    }

    #[test]
    fn test_decode_without_pagination() {
        let raw = RawResponse::new(200, r#"{"response":{"ok":true,"message":"queued"}}"#);
        let decoded: Decoded<serde_json::Value> = decode(&get_request(), &raw).unwrap();
        assert!(decoded.pagination.is_none());
        assert_eq!(decoded.value["message"], "queued");
    }

    #[test]
    fn test_shape_mismatch_is_decode_error() {
        let raw = RawResponse::new(200, r#"{"response":"not a list"}"#);
        let err = decode::<Vec<u32>>(&get_request(), &raw).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_http_error_prefers_description() {
        let raw = RawResponse::new(
            401,
            r#"{"error":"invalid_token","error_description":"The access token is invalid"}"#,
        );
        let err = decode::<serde_json::Value>(&get_request(), &raw).unwrap_err();
        match err {
            ApiError::Http {
                status, message, ..
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "The access token is invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_error_plain_body() {
        let raw = RawResponse::new(502, "Bad Gateway");
        let err = decode::<serde_json::Value>(&get_request(), &raw).unwrap_err();
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
