// Domain errors - Error types for the domain layer

use std::fmt;

/// Message surfaced when the backend rejects a trim without a usable `detail`.
pub const GENERIC_BACKEND_MESSAGE: &str = "Failed to process video";

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// File extension is not an accepted video container
    UnsupportedFormat(String),
    /// Time range rejected locally before any request was sent
    Validation(String),
    /// Request never reached or never returned from the backend
    Transport(String),
    /// Backend answered with a non-success status
    Backend { status: u16, message: String },
    /// Duration probing failed
    ProbeFail(String),
    /// File system operation failed
    FsFail(String),
    /// An action that needs a loaded file was issued without one
    NoMediaSelected,
    /// The selected file's duration never resolved
    DurationUnknown,
    /// An export is already waiting on the backend
    ExportInProgress,
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            DomainError::Validation(msg) => write!(f, "{}", msg),
            DomainError::Transport(msg) => write!(f, "Could not reach the trim backend: {}", msg),
            DomainError::Backend { message, .. } => write!(f, "{}", message),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::NoMediaSelected => write!(f, "No video selected"),
            DomainError::DurationUnknown => {
                write!(f, "Video duration is unknown; cannot pick a trim range")
            }
            DomainError::ExportInProgress => write!(f, "An export is already in progress"),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
