//! API service client
//!
//! Wraps `reqwest` with per-call auth headers and logging interceptors, and
//! exposes a small CRUD surface over a single base URL.

use crate::config::ClientOptions;
use crate::credentials::QueryParams;
use crate::error::{ApiError, ApiResult};
use crate::interceptors::{Interceptors, RequestInterceptor, RequestLogger, ResponseLogger};
use crate::logger::{Logger, TracingLogger};
use crate::request::{merge_headers, Headers, Params, RequestConfig};
use crate::upstream::{header_map, parse_body, ApiResponse, RequestSummary, UpstreamError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{field, instrument, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "x-request-id";

/// HTTP client bound to one base URL
///
/// Every call builds its own request configuration from the given
/// [`QueryParams`]; the client itself holds no per-request state.
#[derive(Clone)]
pub struct ApiService {
    inner: Client,
    base_url: String,
    timeout: Duration,
    default_headers: Headers,
    logger: Arc<dyn Logger>,
    interceptors: Arc<Interceptors>,
}

impl ApiService {
    /// Create a client logging through `tracing` at `options.log_level`
    pub fn create(options: ClientOptions) -> ApiResult<Self> {
        Self::builder(options).build()
    }

    /// Create a client logging through `logger`
    pub fn with_logger(options: ClientOptions, logger: Arc<dyn Logger>) -> ApiResult<Self> {
        Self::builder(options).logger(logger).build()
    }

    /// Start building a client
    #[must_use]
    pub fn builder(options: ClientOptions) -> ApiServiceBuilder {
        ApiServiceBuilder {
            options,
            logger: None,
            request_interceptors: Vec::new(),
        }
    }

    /// The underlying `reqwest` client
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.inner
    }

    /// Base URL, always with a scheme
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout applied to every request
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers sent with every request
    #[must_use]
    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Logger used by the interceptors
    #[must_use]
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    // -------------------------------------------------------------------------
    // CRUD surface
    // -------------------------------------------------------------------------

    /// GET `resource` with explicit query parameters
    ///
    /// `params` override `query_params.params` on key collision.
    #[instrument(skip_all, fields(resource = %resource, request_id = field::Empty))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: Params,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        let mut merged = query_params.params.clone().unwrap_or_default();
        merged.extend(params);
        self.execute(Method::GET, resource.to_string(), Some(merged), None, query_params)
            .await
    }

    /// GET `resource/slug` (`resource/` without a slug)
    #[instrument(skip_all, fields(resource = %resource, request_id = field::Empty))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        slug: Option<&str>,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        self.execute(
            Method::GET,
            resource_path(resource, slug),
            query_params.params.clone(),
            None,
            query_params,
        )
        .await
    }

    /// POST `data` as JSON to `resource`
    #[instrument(skip_all, fields(resource = %resource, request_id = field::Empty))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        data: &B,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        let data = self.body(data)?;
        self.execute(
            Method::POST,
            resource.to_string(),
            query_params.params.clone(),
            Some(data),
            query_params,
        )
        .await
    }

    /// PUT `data` as JSON to `resource`
    #[instrument(skip_all, fields(resource = %resource, request_id = field::Empty))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        data: &B,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        let data = self.body(data)?;
        self.execute(
            Method::PUT,
            resource.to_string(),
            query_params.params.clone(),
            Some(data),
            query_params,
        )
        .await
    }

    /// DELETE `resource/slug` (`resource/` without a slug)
    #[instrument(skip_all, fields(resource = %resource, request_id = field::Empty))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        resource: &str,
        slug: Option<&str>,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        self.execute(
            Method::DELETE,
            resource_path(resource, slug),
            query_params.params.clone(),
            None,
            query_params,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    fn body<B: Serialize + ?Sized>(&self, data: &B) -> ApiResult<Value> {
        serde_json::to_value(data).map_err(|e| self.reject(&UpstreamError::setup(e.to_string())))
    }

    /// Log a failure and wrap its message for the caller
    fn reject(&self, error: &UpstreamError) -> ApiError {
        ApiError::service(self.interceptors.response().on_error(error))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        params: Option<Params>,
        data: Option<Value>,
        query_params: &QueryParams,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let mut config = query_params
            .request_config()
            .with_method(method)
            .with_base_url(self.base_url.clone())
            .with_url(path)
            .with_timeout(self.timeout);
        let mut headers = self.default_headers.clone();
        merge_headers(&mut headers, &config.headers);
        config.headers = headers;
        config.params = params;
        config.data = data;

        let response = self
            .dispatch(config, &request_id)
            .await
            .map_err(|e| self.reject(&e))?;
        let response = self.interceptors.response().on_success(response);

        serde_json::from_value(response.data).map_err(|e| ApiError::service(e.to_string()))
    }

    /// Run the request interceptors, send, and classify the outcome
    async fn dispatch(
        &self,
        config: RequestConfig,
        request_id: &str,
    ) -> Result<ApiResponse, UpstreamError> {
        let config = self
            .interceptors
            .run_request(config)
            .map_err(|e| UpstreamError::setup(e.to_string()))?;

        // A caller-supplied correlation id replaces the generated one
        let mut headers = HeaderMap::new();
        headers.insert(
            X_REQUEST_ID,
            HeaderValue::from_str(request_id).map_err(|e| UpstreamError::setup(e.to_string()))?,
        );
        headers.extend(header_values(&config.headers).map_err(UpstreamError::setup)?);

        let method = config.method.clone().unwrap_or(Method::GET);
        let mut request = self
            .inner
            .request(method, config.full_url())
            .headers(headers);

        let query = config.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }

        if let Some(ref data) = config.data {
            request = request.json(data);
        }

        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let request = request
            .build()
            .map_err(|e| UpstreamError::from_reqwest(&e, &config))?;

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e, &config))?;

        let status = response.status();
        let headers = header_map(response.headers());
        let url = response.url().to_string();
        let body = response.bytes().await.map_err(|e| UpstreamError::NoResponse {
            request: RequestSummary::of(&config),
            message: e.to_string(),
        })?;
        let data = parse_body(&body);

        if !status.is_success() {
            return Err(UpstreamError::server(status.as_u16(), &config, data));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            data,
            url,
        })
    }
}

/// Builder for [`ApiService`]
pub struct ApiServiceBuilder {
    options: ClientOptions,
    logger: Option<Arc<dyn Logger>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiServiceBuilder {
    /// Log through `logger` instead of `tracing`
    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Register a request interceptor; runs after the built-in logger
    #[must_use]
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Validate the options and build the client
    pub fn build(self) -> ApiResult<ApiService> {
        let Self {
            options,
            logger,
            request_interceptors,
        } = self;
        options.validate()?;

        let logger =
            logger.unwrap_or_else(|| Arc::new(TracingLogger::new(options.log_level)) as Arc<dyn Logger>);
        let base_url = options.base_url();
        let timeout = options.effective_timeout();
        let default_headers = options.headers.clone().unwrap_or_default();

        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(header_values(&default_headers).map_err(ApiError::Config)?)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        let mut interceptors = Interceptors::new(
            RequestLogger::new(logger.clone()),
            ResponseLogger::new(logger.clone()),
        );
        for interceptor in request_interceptors {
            interceptors.push_request(interceptor);
        }

        Ok(ApiService {
            inner,
            base_url,
            timeout,
            default_headers,
            logger,
            interceptors: Arc::new(interceptors),
        })
    }
}

/// Convert to a `HeaderMap`; entries are inserted, never appended
fn header_values(headers: &Headers) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| format!("invalid header name: {name}"))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| format!("invalid value for header {name}"))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// `resource/slug`, keeping the trailing slash when there is no slug
fn resource_path(resource: &str, slug: Option<&str>) -> String {
    format!("{resource}/{}", slug.unwrap_or_default())
}
