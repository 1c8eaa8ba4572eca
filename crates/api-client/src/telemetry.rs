//! Optional process-wide `tracing` subscriber
//!
//! The client only emits events; applications that want them printed call
//! [`init_subscriber`] once at startup.

use crate::error::{ApiError, ApiResult};
use crate::logger::LogLevel;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Subscriber configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Print event targets
    pub show_target: bool,
    /// Print thread ids
    pub show_thread_ids: bool,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            show_target: false,
            show_thread_ids: false,
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Configuration with a given minimum level
    #[must_use]
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_subscriber(config: &LoggingConfig) -> ApiResult<()> {
    let registry = tracing_subscriber::registry().with(build_filter(config));

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| ApiError::config(format!("Failed to set tracing subscriber: {e}")))?;

    tracing::debug!(level = %config.level, "Logging initialized");
    Ok(())
}
