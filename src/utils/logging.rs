//! Logging configuration and subscriber setup

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{ClientError, ClientResult};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// General information
    Info,
    /// Debug information
    Debug,
    /// Very verbose debug information
    Trace,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, String> {
        match level_str.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            )),
        }
    }

    /// Directive understood by `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Pretty,
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(format_str: &str) -> Result<Self, String> {
        match format_str.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                format_str
            )),
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    level: LogLevel,
    format: LogFormat,
}

impl LoggingSystem {
    pub fn new(level: LogLevel, format: LogFormat) -> Self {
        Self { level, format }
    }

    /// `RUST_LOG` wins over the configured level when set
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_filter()))
    }

    /// Install the global subscriber, writing to stderr
    pub fn initialize(&self) -> ClientResult<()> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr);

        let result = match self.format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        result.map_err(|e| ClientError::LoggingInit {
            message: e.to_string(),
        })?;

        tracing::debug!(level = ?self.level, format = ?self.format, "Logging system initialized");
        Ok(())
    }

    /// Log system information
    pub fn log_system_info(&self) {
        tracing::info!("=== trimx-remote ===");
        tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
        tracing::info!("Logging level: {:?}", self.level);
    }
}
