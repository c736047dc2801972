//! Playback surface: a virtual playhead bound to one loaded file

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{MediaHandle, SelectedMedia};
use crate::ports::MediaHostPort;

/// Inbound seeks closer than this to the current position are ignored
pub const SYNC_EPSILON: f64 = 0.001;

/// Transport state of the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    Paused,
    Playing,
}

/// Holds the playback handle for the loaded file and its position.
///
/// Position changes made by the surface itself (`advance`, `scrub`) are
/// returned to the caller to report upward; `sync_to` is the inbound path.
pub struct PlaybackSurface {
    host: Arc<dyn MediaHostPort>,
    handle: Option<MediaHandle>,
    position: f64,
    duration: Option<f64>,
    mode: PlaybackMode,
}

impl PlaybackSurface {
    pub fn new(host: Arc<dyn MediaHostPort>) -> Self {
        Self {
            host,
            handle: None,
            position: 0.0,
            duration: None,
            mode: PlaybackMode::Paused,
        }
    }

    /// Bind to a new file. The previous handle is released only once the
    /// new one is acquired; on failure the surface is left as it was.
    pub fn load(&mut self, media: &SelectedMedia) -> Result<(), DomainError> {
        let handle = self.host.open_handle(media)?;
        self.teardown();
        debug!(handle = handle.id(), file = %media.name, "Playback surface loaded");
        self.handle = Some(handle);
        Ok(())
    }

    /// Release the handle and reset the transport
    pub fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(handle = handle.id(), "Playback surface released");
        }
        self.position = 0.0;
        self.duration = None;
        self.mode = PlaybackMode::Paused;
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration;
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn play(&mut self) {
        if self.is_loaded() {
            self.mode = PlaybackMode::Playing;
        }
    }

    pub fn pause(&mut self) {
        self.mode = PlaybackMode::Paused;
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let upper = self.duration.unwrap_or(f64::MAX);
        seconds.clamp(0.0, upper)
    }

    /// Playback progressed by `elapsed` seconds; stops at the end of the file
    pub fn advance(&mut self, elapsed: f64) -> Option<f64> {
        if self.mode != PlaybackMode::Playing || !elapsed.is_finite() || elapsed <= 0.0 {
            return None;
        }
        let next = self.clamp(self.position + elapsed);
        if Some(next) == self.duration {
            self.mode = PlaybackMode::Paused;
        }
        self.position = next;
        Some(next)
    }

    /// The surface's own control was dragged
    pub fn scrub(&mut self, seconds: f64) -> Option<f64> {
        if !self.is_loaded() || !seconds.is_finite() {
            return None;
        }
        self.position = self.clamp(seconds);
        Some(self.position)
    }

    /// Follow an externally held time; returns true when a seek happened
    pub fn sync_to(&mut self, seconds: f64) -> bool {
        if !self.is_loaded() || (self.position - seconds).abs() <= SYNC_EPSILON {
            return false;
        }
        self.position = self.clamp(seconds);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local_host::LocalMediaHost;

    fn setup() -> (tempfile::TempDir, Arc<LocalMediaHost>, SelectedMedia, SelectedMedia) {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mkv");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();
        let host = Arc::new(LocalMediaHost::new());
        let a = SelectedMedia::from_path(a).unwrap();
        let b = SelectedMedia::from_path(b).unwrap();
        (dir, host, a, b)
    }

    #[test]
    fn test_one_handle_per_loaded_file() {
        let (_dir, host, a, b) = setup();
        let mut surface = PlaybackSurface::new(host.clone());

        surface.load(&a).unwrap();
        assert_eq!(host.live_handles(), 1);
        surface.load(&b).unwrap();
        assert_eq!(host.live_handles(), 1);
        surface.teardown();
        assert_eq!(host.live_handles(), 0);
        assert!(!surface.is_loaded());
    }

    #[test]
    fn test_failed_load_keeps_current_file() {
        let (_dir, host, a, b) = setup();
        let mut surface = PlaybackSurface::new(host.clone());
        surface.load(&a).unwrap();
        surface.set_duration(Some(5.0));
        surface.sync_to(2.0);

        std::fs::remove_file(&b.path).unwrap();
        assert!(matches!(surface.load(&b), Err(DomainError::FsFail(_))));
        assert!(surface.is_loaded());
        assert_eq!(surface.position(), 2.0);
        assert_eq!(host.live_handles(), 1);
    }

    #[test]
    fn test_drop_releases_handle() {
        let (_dir, host, a, _) = setup();
        {
            let mut surface = PlaybackSurface::new(host.clone());
            surface.load(&a).unwrap();
            assert_eq!(host.live_handles(), 1);
        }
        assert_eq!(host.live_handles(), 0);
    }

    #[test]
    fn test_sync_ignores_sub_millisecond_changes() {
        let (_dir, host, a, _) = setup();
        let mut surface = PlaybackSurface::new(host);
        surface.load(&a).unwrap();
        surface.set_duration(Some(10.0));

        assert!(surface.sync_to(2.0));
        assert_eq!(surface.position(), 2.0);
        assert!(!surface.sync_to(2.0005));
        assert_eq!(surface.position(), 2.0);
        assert!(surface.sync_to(2.002));
        assert_eq!(surface.position(), 2.002);
    }

    #[test]
    fn test_playback_stops_at_end() {
        let (_dir, host, a, _) = setup();
        let mut surface = PlaybackSurface::new(host);
        surface.load(&a).unwrap();
        surface.set_duration(Some(1.0));

        assert_eq!(surface.advance(0.5), None);
        surface.play();
        assert_eq!(surface.advance(0.5), Some(0.5));
        assert_eq!(surface.advance(0.75), Some(1.0));
        assert_eq!(surface.mode(), PlaybackMode::Paused);
        assert_eq!(surface.advance(0.1), None);
    }

    #[test]
    fn test_scrub_requires_loaded_file() {
        let (_dir, host, a, _) = setup();
        let mut surface = PlaybackSurface::new(host);
        assert_eq!(surface.scrub(3.0), None);
        surface.load(&a).unwrap();
        surface.set_duration(Some(2.0));
        assert_eq!(surface.scrub(3.0), Some(2.0));
        assert_eq!(surface.scrub(-1.0), Some(0.0));
    }
}
