//! Per-call credentials and auth header derivation

use crate::request::{insert_header, merge_headers, Headers, Params, RequestConfig};
use serde::{Deserialize, Serialize};

/// `Authorization` header name
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// API key header name
pub const API_KEY_HEADER: &str = "x-api-key";

/// Build a request configuration carrying auth headers
///
/// Sets `Authorization: Bearer <token>` and `x-api-key: <api_key>` when
/// given, then merges `headers` on top so caller-supplied values win on
/// collision (names compare case-insensitively). Only `headers` is populated on the returned configuration.
#[must_use]
pub fn configure(token: Option<&str>, api_key: Option<&str>, headers: Option<&Headers>) -> RequestConfig {
    let mut merged = Headers::new();

    if let Some(token) = token {
        merged.insert(AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}"));
    }

    if let Some(key) = api_key {
        merged.insert(API_KEY_HEADER.to_string(), key.to_string());
    }

    if let Some(extra) = headers {
        merge_headers(&mut merged, extra);
    }

    RequestConfig {
        headers: merged,
        ..RequestConfig::default()
    }
}

/// Per-call options shared by every CRUD operation
///
/// Never stored by the client; each call derives its own configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Bearer token
    pub token: Option<String>,
    /// API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Query string parameters
    pub params: Option<Params>,
    /// Extra headers, overriding the auth headers on collision
    pub headers: Option<Headers>,
}

impl QueryParams {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to set the bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set query parameters
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Builder-style method to add one header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(self.headers.get_or_insert_with(Headers::new), name, value);
        self
    }

    /// Request configuration with the auth headers for these options
    #[must_use]
    pub fn request_config(&self) -> RequestConfig {
        configure(
            self.token.as_deref(),
            self.api_key.as_deref(),
            self.headers.as_ref(),
        )
    }
}
