//! Options for building an API service client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use crate::logger::LogLevel;
use crate::request::{ensure_protocol, insert_header, Headers};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Timeout applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Client options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Host, with or without scheme
    pub host: String,
    /// Request timeout in milliseconds
    #[serde(default, with = "millis")]
    pub timeout: Option<Duration>,
    /// Minimum log level
    #[serde(default)]
    pub log_level: LogLevel,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: Option<Headers>,
}

mod millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

impl ClientOptions {
    /// Options for `host` with default timeout and `info` logging
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: None,
            log_level: LogLevel::default(),
            headers: None,
        }
    }

    /// Create options from environment variables
    ///
    /// Reads the following environment variables:
    /// - `API_SERVICE_HOST`: host to talk to (required)
    /// - `API_SERVICE_TIMEOUT_MS`: request timeout in milliseconds
    /// - `API_SERVICE_LOG_LEVEL`: minimum log level (default `info`)
    pub fn from_env() -> ApiResult<Self> {
        let host = env::var("API_SERVICE_HOST")
            .map_err(|_| ApiError::config("Missing environment variable: API_SERVICE_HOST"))?;

        let timeout = env::var("API_SERVICE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis);

        let log_level = match env::var("API_SERVICE_LOG_LEVEL") {
            Ok(level) => level.parse()?,
            Err(_) => LogLevel::default(),
        };

        Ok(Self {
            host,
            timeout,
            log_level,
            headers: None,
        })
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder-style method to set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Builder-style method to replace the default headers
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Builder-style method to add one default header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(self.headers.get_or_insert_with(Headers::new), name, value);
        self
    }

    /// Host with a scheme
    #[must_use]
    pub fn base_url(&self) -> String {
        ensure_protocol(&self.host)
    }

    /// Configured timeout, or [`DEFAULT_TIMEOUT`]
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Validate the options
    pub fn validate(&self) -> ApiResult<()> {
        if self.host.trim().is_empty() {
            return Err(ApiError::config("host cannot be empty"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        for (name, value) in self.headers.iter().flatten() {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::config(format!("invalid header name: {name}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| ApiError::config(format!("invalid value for header {name}")))?;
        }

        Ok(())
    }
}
