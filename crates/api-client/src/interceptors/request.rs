//! Request logging interceptor
//!
//! Observational only: the configuration passes through untouched. If the
//! logging itself breaks, the request is aborted instead of going out
//! unlogged.

use super::RequestInterceptor;
use crate::error::{InterceptError, LogError};
use crate::logger::Logger;
use crate::request::RequestConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Built-in interceptor logging every outgoing request
#[derive(Clone)]
pub struct RequestLogger {
    logger: Arc<dyn Logger>,
}

impl RequestLogger {
    /// Create an interceptor logging through `logger`
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl RequestInterceptor for RequestLogger {
    fn intercept(&self, config: RequestConfig) -> Result<RequestConfig, InterceptError> {
        intercept_request(self.logger.as_ref(), config)
    }
}

/// Log `config` and hand it back unchanged
///
/// A logger that returns an error has that exact error propagated; a logger
/// that panics is normalized through [`normalize_error`]. Either way an
/// error entry naming the request URL is written first.
///
/// Catching a panicking logger needs unwinding: under `panic = "abort"` such
/// a logger aborts the process instead of yielding [`InterceptError::Unknown`].
pub fn intercept_request(
    logger: &dyn Logger,
    config: RequestConfig,
) -> Result<RequestConfig, InterceptError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| log_request(logger, &config)));

    let err = match outcome {
        Ok(Ok(())) => return Ok(config),
        Ok(Err(err)) => err,
        Err(payload) => normalize_error(payload),
    };

    let target = config.url.as_deref().unwrap_or("unknown");
    let message = match err {
        InterceptError::Unknown => {
            format!("Unknown error type in request interceptor for URL: {target}")
        }
        _ => format!("Error in request interceptor for URL: {target}"),
    };
    let _ = logger.error(&message, Some(&json!({ "error": err.to_string() })));

    Err(err)
}

fn log_request(logger: &dyn Logger, config: &RequestConfig) -> Result<(), InterceptError> {
    let method = config.display_method();
    let url = config.display_url();
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    logger.info(&format!("[{timestamp}] [{method}] - {url}"), None)?;

    let headers = serde_json::to_string(&config.headers)?;
    logger.debug(&format!("[Request Headers] - {headers}"), None)?;

    let params = match &config.params {
        Some(params) => serde_json::to_string(params)?,
        None => "{}".to_string(),
    };
    logger.debug(&format!("[Request Params] - {params}"), None)?;

    Ok(())
}

/// Turn a caught panic payload into an error
///
/// Payloads that already are one of the interceptor's error types come back
/// as that exact error; anything else becomes [`InterceptError::Unknown`].
#[must_use]
pub fn normalize_error(payload: Box<dyn Any + Send>) -> InterceptError {
    let payload = match payload.downcast::<InterceptError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<LogError>() {
        Ok(err) => return InterceptError::Logging(*err),
        Err(payload) => payload,
    };
    match payload.downcast::<serde_json::Error>() {
        Ok(err) => InterceptError::Serialization(*err),
        Err(_) => InterceptError::Unknown,
    }
}
