//! Structured logging seam
//!
//! The client never talks to a global logger. A [`Logger`] is handed to the
//! client factory and every interceptor logs through it:
//! - [`TracingLogger`] forwards entries to `tracing` events
//! - [`MemoryLogger`] keeps entries in memory for inspection

use crate::error::{ApiError, LogError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Full payload dumps
    Trace,
    /// Request details
    Debug,
    /// One line per request
    Info,
    /// Suspicious but recoverable
    Warn,
    /// Failed exchanges
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LogLevel {
    /// Lowercase name, as accepted by `EnvFilter`
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ApiError::config(format!("unknown log level: {other}"))),
        }
    }
}

/// Severity-leveled structured logger
///
/// Entries carry a message and an optional JSON context. Logging is fallible
/// so callers can decide whether a broken sink should stop the work it
/// describes.
pub trait Logger: Send + Sync {
    /// Record one entry
    fn log(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<(), LogError>;

    /// Record a trace entry
    fn trace(&self, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        self.log(LogLevel::Trace, message, context)
    }

    /// Record a debug entry
    fn debug(&self, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        self.log(LogLevel::Debug, message, context)
    }

    /// Record an info entry
    fn info(&self, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        self.log(LogLevel::Info, message, context)
    }

    /// Record a warning entry
    fn warn(&self, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        self.log(LogLevel::Warn, message, context)
    }

    /// Record an error entry
    fn error(&self, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        self.log(LogLevel::Error, message, context)
    }
}

/// Logger that emits `tracing` events at or above a minimum level
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    level: LogLevel,
}

impl TracingLogger {
    /// Create a logger that drops entries below `level`
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Minimum emitted level
    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        if level < self.level {
            return Ok(());
        }

        let context = context.map(Value::to_string).unwrap_or_default();
        match level {
            LogLevel::Trace => tracing::trace!(context = %context, "{message}"),
            LogLevel::Debug => tracing::debug!(context = %context, "{message}"),
            LogLevel::Info => tracing::info!(context = %context, "{message}"),
            LogLevel::Warn => tracing::warn!(context = %context, "{message}"),
            LogLevel::Error => tracing::error!(context = %context, "{message}"),
        }

        Ok(())
    }
}

/// One recorded log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: String,
    /// Structured context, if any
    pub context: Option<Value>,
}

/// Logger that keeps every entry in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    /// Create an empty logger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Entries recorded at `level`
    #[must_use]
    pub fn at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// Whether an entry at `level` contains `needle` in its message
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.at(level)
            .iter()
            .any(|entry| entry.message.contains(needle))
    }

    /// Drop all recorded entries
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<(), LogError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LogError::sink("memory logger poisoned"))?;
        entries.push(LogEntry {
            level,
            message: message.to_string(),
            context: context.cloned(),
        });
        Ok(())
    }
}
