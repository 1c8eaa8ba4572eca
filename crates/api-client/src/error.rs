//! Error types for the API service

use thiserror::Error;

/// Fixed tag prefixed to every error surfaced by the CRUD operations
pub const SERVICE_ERROR_TAG: &str = "[RWV] ApiService Error:";

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the public API surface
#[derive(Error, Debug)]
pub enum ApiError {
    /// A CRUD operation failed; only the upstream message is carried
    #[error("[RWV] ApiService Error: {0}")]
    Service(String),

    /// Client construction failed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Create a service error from an upstream message
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The upstream message without the service tag
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Service(msg) | Self::Config(msg) => msg,
        }
    }
}

/// A logger failed to record an entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The sink behind the logger rejected the entry
    #[error("log sink failed: {0}")]
    Sink(String),
}

impl LogError {
    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }
}

/// Failure raised by the request interceptor, aborting the request
#[derive(Error, Debug)]
pub enum InterceptError {
    /// Logging the request failed
    #[error(transparent)]
    Logging(#[from] LogError),

    /// Serializing headers or params failed
    #[error("failed to serialize request details: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Something that was not an error value was raised
    #[error("Unknown error in request interceptor")]
    Unknown,
}
