//! What comes back from an HTTP exchange
//!
//! Failures are classified exactly once, where `reqwest` hands them over, into
//! one of three shapes: the server answered with an error status, the request
//! went out but nothing came back, or the request never left.

use crate::request::{Headers, RequestConfig};
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Successful response as seen by the response interceptors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Parsed body
    pub data: Value,
    /// URL that was requested
    pub url: String,
}

/// Minimal description of a request that was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    /// HTTP verb
    pub method: String,
    /// Full URL
    pub url: String,
}

impl RequestSummary {
    /// Summary of a configuration about to be sent
    #[must_use]
    pub fn of(config: &RequestConfig) -> Self {
        Self {
            method: config.display_method(),
            url: config.full_url(),
        }
    }
}

/// A failed HTTP exchange
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The server responded with a non-2xx status
    #[error("{message}")]
    Server {
        /// Response status
        status: u16,
        /// Request URL
        url: String,
        /// Request verb
        method: String,
        /// Request headers
        headers: Headers,
        /// Response body
        data: Value,
        /// Human-readable message
        message: String,
    },

    /// The request was sent but no response arrived
    #[error("{message}")]
    NoResponse {
        /// The request that went unanswered
        request: RequestSummary,
        /// Human-readable message
        message: String,
    },

    /// The request failed before it was sent
    #[error("{message}")]
    Setup {
        /// Human-readable message
        message: String,
    },
}

impl UpstreamError {
    /// Build a server error from a failed response
    #[must_use]
    pub fn server(status: u16, config: &RequestConfig, data: Value) -> Self {
        Self::Server {
            status,
            url: config.url.clone().unwrap_or_default(),
            method: config.display_method(),
            headers: config.headers.clone(),
            data,
            message: format!("Request failed with status code {status}"),
        }
    }

    /// Build a setup error
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    /// Classify a `reqwest` error raised while sending `config`
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, config: &RequestConfig) -> Self {
        if err.is_builder() {
            return Self::setup(err.to_string());
        }

        if let Some(status) = err.status() {
            return Self::server(status.as_u16(), config, Value::Null);
        }

        Self::NoResponse {
            request: RequestSummary::of(config),
            message: err.to_string(),
        }
    }

    /// The message carried by every shape
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Server { message, .. }
            | Self::NoResponse { message, .. }
            | Self::Setup { message } => message,
        }
    }
}

/// Parse a body as JSON, falling back to a string (empty body is `null`)
#[must_use]
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Flatten response headers into a string map
#[must_use]
pub fn header_map(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
