//! Hooks run on every outgoing request and every response or failure
//!
//! | Interceptor | Runs on | Behavior |
//! |-------------|---------|----------|
//! | [`RequestLogger`] | request | logs method, URL, headers and params; fails closed |
//! | [`ResponseLogger::on_success`] | 2xx response | trace-logs the response |
//! | [`ResponseLogger::on_error`] | failure | logs by failure shape, rejects with the message |

pub mod request;
pub mod response;

pub use request::{intercept_request, normalize_error, RequestLogger};
pub use response::{intercept_error, intercept_response, ResponseLogger};

use crate::error::InterceptError;
use crate::request::RequestConfig;
use std::sync::Arc;

/// Hook invoked with every outgoing request configuration
///
/// Returning an error aborts the request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    /// Observe or adjust the configuration
    fn intercept(&self, config: RequestConfig) -> Result<RequestConfig, InterceptError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestConfig) -> Result<RequestConfig, InterceptError> + Send + Sync,
{
    fn intercept(&self, config: RequestConfig) -> Result<RequestConfig, InterceptError> {
        self(config)
    }
}

/// Interceptors registered on a client
#[derive(Clone)]
pub struct Interceptors {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: ResponseLogger,
}

impl Interceptors {
    /// Registry holding the built-in logging interceptors
    #[must_use]
    pub fn new(request: RequestLogger, response: ResponseLogger) -> Self {
        Self {
            request: vec![Arc::new(request)],
            response,
        }
    }

    /// Append a request interceptor; runs after those already registered
    pub fn push_request(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.request.push(interceptor);
    }

    /// Run every request interceptor in registration order
    pub fn run_request(&self, config: RequestConfig) -> Result<RequestConfig, InterceptError> {
        self.request
            .iter()
            .try_fold(config, |config, interceptor| interceptor.intercept(config))
    }

    /// The response interceptor
    #[must_use]
    pub fn response(&self) -> &ResponseLogger {
        &self.response
    }
}
