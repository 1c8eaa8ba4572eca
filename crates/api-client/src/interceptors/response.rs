//! Response interceptors: trace successes, classify and log failures

use crate::logger::Logger;
use crate::upstream::{ApiResponse, UpstreamError};
use serde_json::json;
use std::sync::Arc;

/// Built-in interceptor for responses and failed exchanges
#[derive(Clone)]
pub struct ResponseLogger {
    logger: Arc<dyn Logger>,
}

impl ResponseLogger {
    /// Create an interceptor logging through `logger`
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// See [`intercept_response`]
    #[must_use]
    pub fn on_success(&self, response: ApiResponse) -> ApiResponse {
        intercept_response(self.logger.as_ref(), response)
    }

    /// See [`intercept_error`]
    #[must_use]
    pub fn on_error(&self, error: &UpstreamError) -> String {
        intercept_error(self.logger.as_ref(), error)
    }
}

/// Trace-log the full response and return it unchanged
pub fn intercept_response(logger: &dyn Logger, response: ApiResponse) -> ApiResponse {
    let context = serde_json::to_value(&response).unwrap_or_default();
    let _ = logger.trace("Response received:", Some(&context));
    response
}

/// Log a failed exchange according to its shape
///
/// Returns the rejection value: just the error's message. Status, headers
/// and body only ever reach the log.
pub fn intercept_error(logger: &dyn Logger, error: &UpstreamError) -> String {
    let (message, context) = match error {
        UpstreamError::Server {
            status,
            url,
            method,
            headers,
            data,
            message,
        } => (
            "Response Error",
            json!({
                "error": message,
                "status": status,
                "url": url,
                "method": method,
                "headers": headers,
                "response": data,
            }),
        ),
        UpstreamError::NoResponse { request, message } => (
            "Request Error",
            json!({
                "error": message,
                "message": "The request was made but no response was received",
                "request": request,
            }),
        ),
        UpstreamError::Setup { message } => (
            "Setup Error",
            json!({
                "error": message,
                "message": "Something happened in setting up the request that triggered an error",
            }),
        ),
    };

    let _ = logger.error(message, Some(&context));

    error.message().to_string()
}
