//! trimx-remote library
//!
//! Select a local video, pick a time range against its probed duration, and
//! have a remote trim backend cut that range; the trimmed file is saved into
//! a download directory.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config_initialization::{ClientConfig, ConfigOverrides};
pub use domain::errors::DomainError;
pub use domain::model::{ExportReport, SelectedMedia, TimeRange, TimeSpec, TrimRequest};
pub use error::{ClientError, ClientResult};

/// Initialize trimx-remote library
pub fn init() -> ClientResult<()> {
    ffmpeg_next::init().map_err(|e| ClientError::FFmpegInit {
        message: e.to_string(),
    })?;

    Ok(())
}
