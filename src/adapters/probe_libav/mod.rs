// Probe LibAV adapter - Duration probing from container metadata

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use ffmpeg::media::Type;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// LibAV-based duration probe
pub struct ProbeLibavAdapter {
    host: Arc<dyn MediaHostPort>,
}

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter; expects `crate::init` to have run
    pub fn new(host: Arc<dyn MediaHostPort>) -> Self {
        Self { host }
    }
}

/// Open the demuxer just far enough to read the duration
fn read_duration(path: &Path) -> Result<f64, DomainError> {
    let ictx = ffmpeg::format::input(path)
        .map_err(|e| DomainError::ProbeFail(format!("Cannot open {}: {}", path.display(), e)))?;

    let raw = ictx.duration();
    if raw != ffmpeg::ffi::AV_NOPTS_VALUE && raw > 0 {
        return Ok(raw as f64 / ffmpeg::ffi::AV_TIME_BASE as f64);
    }

    // Container carries no duration; fall back to the primary stream
    let stream = ictx
        .streams()
        .best(Type::Video)
        .or_else(|| ictx.streams().best(Type::Audio))
        .ok_or_else(|| DomainError::ProbeFail("No audio or video stream".to_string()))?;
    let tb = stream.time_base();
    if stream.duration() <= 0 || tb.denominator() == 0 {
        return Err(DomainError::ProbeFail("Duration unknown".to_string()));
    }
    Ok(stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64)
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_duration(&self, media: &SelectedMedia) -> Result<f64, DomainError> {
        // Held for the whole probe; released when this scope ends, on any path
        let handle = self.host.open_handle(media)?;
        let path = handle.path().to_path_buf();

        let duration = tokio::task::spawn_blocking(move || read_duration(&path))
            .await
            .map_err(|e| DomainError::InternalError(format!("Probe task failed: {}", e)))??;

        debug!(file = %media.name, handle = handle.id(), duration, "Duration probed");
        Ok(duration)
    }
}
