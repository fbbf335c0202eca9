//! API client error types

use std::time::Duration;
use thiserror::Error;

/// Errors returned by every stackport operation
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network-level failure (connect, TLS, reading the body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("{method} {url} failed: {status}: {message}")]
    Http {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("Decode error for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A client-side lookup found no match
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A polling deadline passed before the operation reached a terminal state
    #[error("timed-out after {} second(s)", .0.as_secs())]
    Timeout(Duration),

    /// The request could not be built (body serialization, bad URL)
    #[error("Request construction failed: {0}")]
    RequestConstruction(String),

    /// Missing or invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether the error came from the transport layer (network or HTTP status)
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Http { .. })
    }

    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::RequestConstruction(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
