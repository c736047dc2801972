//! Error handling module for trimx-remote

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Crate-boundary error type
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration file, environment or flag could not be used
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Logging subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInit { message: String },

    /// Failure from the trim workflow
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for crate-boundary operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;
