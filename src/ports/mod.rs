// Ports - Interface definitions (contracts)

use std::path::PathBuf;

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for the host's transient file references
pub trait MediaHostPort: Send + Sync {
    /// Acquire a handle bound to the file's bytes; dropping it releases it
    fn open_handle(&self, media: &SelectedMedia) -> Result<MediaHandle, DomainError>;

    /// Number of handles acquired and not yet released
    fn live_handles(&self) -> usize;
}

/// Port for reading a file's duration from its container metadata
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration in seconds; any error means the duration stays unknown
    async fn probe_duration(&self, media: &SelectedMedia) -> Result<f64, DomainError>;
}

/// Port for the single request/response exchange with the trim backend
#[async_trait]
pub trait TrimTransportPort: Send + Sync {
    /// Send file and range; any HTTP status comes back as a response,
    /// only a missing response is an error (`DomainError::Transport`)
    async fn send_trim(&self, request: &TrimRequest) -> Result<TrimResponse, DomainError>;
}

/// Port for handing a finished result to the user
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Take ownership of the result, save it under its suggested name
    /// and return where it landed
    async fn save(&self, result: TrimResult, fallback_name: &str) -> Result<PathBuf, DomainError>;
}
