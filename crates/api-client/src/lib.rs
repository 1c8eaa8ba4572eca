//! Thin CRUD client over `reqwest` with auth headers and request logging
//!
//! This crate wraps a single base URL and exposes `query`, `get`, `post`,
//! `put` and `delete`. Every call derives its own headers from the supplied
//! credentials, and every exchange passes through logging interceptors.
//!
//! # Features
//!
//! - **Per-call credentials**: bearer token, API key and extra headers
//! - **Request logging**: method, URL, headers and params for every request
//! - **Failure classification**: server error, no response, or setup failure
//! - **Injected logger**: no global logging state; tests can capture output
//!
//! # Example
//!
//! ```rust,no_run
//! use api_service::{ApiService, ClientOptions, LogLevel, QueryParams};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ApiService::create(
//!         ClientOptions::new("api.example.com").with_log_level(LogLevel::Debug),
//!     )?;
//!
//!     let user: Value = service
//!         .get("users", Some("42"), &QueryParams::new().with_token("abc"))
//!         .await?;
//!     println!("{user}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod interceptors;
pub mod logger;
pub mod request;
pub mod telemetry;
pub mod upstream;

pub use client::{ApiService, ApiServiceBuilder};
pub use config::{ClientOptions, DEFAULT_TIMEOUT};
pub use credentials::{configure, QueryParams};
pub use error::{ApiError, ApiResult, InterceptError, LogError};
pub use logger::{LogLevel, Logger, MemoryLogger, TracingLogger};
pub use request::{Headers, Params, RequestConfig};
pub use upstream::{ApiResponse, UpstreamError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ApiService;
    pub use crate::config::ClientOptions;
    pub use crate::credentials::QueryParams;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::logger::{LogLevel, Logger};
}
