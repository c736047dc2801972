//! Editor session: owns the selected file, its time range and the playback surface

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::export_interactor::ExportInteractor;
use crate::app::playback::{PlaybackMode, PlaybackSurface};
use crate::app::probe_interactor::ProbeInteractor;
use crate::app::range_selector::{ControlKind, RangeControl, RangeSelector};
use crate::domain::errors::DomainError;
use crate::domain::model::{ExportReport, SelectedMedia, TimeRange, TimeSpec, TrimRequest};
use crate::ports::MediaHostPort;

/// Snapshot of the session for display
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub file: Option<String>,
    pub range: Option<TimeRange>,
    pub mode: PlaybackMode,
    pub exporting: bool,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(file) = &self.file else {
            return write!(f, "No video selected");
        };
        match &self.range {
            Some(range) => write!(
                f,
                "{} | {} / {} | trim {} - {} ({}) | {:?}",
                file,
                TimeSpec::from_seconds(range.current_time()),
                TimeSpec::from_seconds(range.duration()),
                TimeSpec::from_seconds(range.start_time()),
                TimeSpec::from_seconds(range.end_time()),
                TimeSpec::from_seconds(range.selection_length()),
                self.mode
            )?,
            None => write!(f, "{} | duration unknown", file)?,
        }
        if self.exporting {
            write!(f, " | exporting")?;
        }
        Ok(())
    }
}

/// One editing session over at most one file at a time
pub struct EditorSession {
    probe: Arc<ProbeInteractor>,
    export: Arc<ExportInteractor>,
    surface: PlaybackSurface,
    media: Option<SelectedMedia>,
    range: Option<TimeRange>,
}

impl EditorSession {
    pub fn new(
        host: Arc<dyn MediaHostPort>,
        probe: Arc<ProbeInteractor>,
        export: Arc<ExportInteractor>,
    ) -> Self {
        Self {
            probe,
            export,
            surface: PlaybackSurface::new(host),
            media: None,
            range: None,
        }
    }

    /// Replace the current file. A file that cannot be opened leaves the
    /// current selection in place; otherwise state from the previous file is
    /// discarded before the new one is probed.
    pub async fn select_media(&mut self, path: impl AsRef<Path>) -> Result<(), DomainError> {
        let media = SelectedMedia::from_path(path)?;
        self.surface.load(&media)?;
        self.media = None;
        self.range = None;

        info!(file = %media.name, size = media.size, "Video selected");

        let duration = self.probe.resolve_duration(&media).await;
        if duration.is_none() {
            warn!(file = %media.name, "Trim range unavailable until the duration is known");
        }
        self.surface.set_duration(duration);
        self.range = duration.map(TimeRange::new);
        self.media = Some(media);
        Ok(())
    }

    pub fn clear_media(&mut self) {
        self.surface.teardown();
        self.media = None;
        self.range = None;
    }

    pub fn media(&self) -> Option<&SelectedMedia> {
        self.media.as_ref()
    }

    pub fn range(&self) -> Option<&TimeRange> {
        self.range.as_ref()
    }

    pub fn surface(&self) -> &PlaybackSurface {
        &self.surface
    }

    fn range_mut(&mut self) -> Result<&mut TimeRange, DomainError> {
        if self.media.is_none() {
            return Err(DomainError::NoMediaSelected);
        }
        self.range.as_mut().ok_or(DomainError::DurationUnknown)
    }

    /// Controls for the current state
    pub fn controls(&self) -> Result<[RangeControl; 3], DomainError> {
        if self.media.is_none() {
            return Err(DomainError::NoMediaSelected);
        }
        let range = self.range.as_ref().ok_or(DomainError::DurationUnknown)?;
        Ok(RangeSelector::controls(range))
    }

    /// Apply a control change; moving the playhead also seeks the surface
    pub fn change_control(&mut self, kind: ControlKind, raw: f64) -> Result<f64, DomainError> {
        let value = RangeSelector::change(self.range_mut()?, kind, raw);
        if kind == ControlKind::Playhead {
            self.surface.sync_to(value);
        }
        Ok(value)
    }

    /// The surface reported a new position
    pub fn surface_time_changed(&mut self, seconds: f64) {
        if let Some(range) = self.range.as_mut() {
            range.set_current_time(seconds);
        }
    }

    pub fn play(&mut self) -> Result<(), DomainError> {
        if self.media.is_none() {
            return Err(DomainError::NoMediaSelected);
        }
        self.surface.play();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.surface.pause();
    }

    /// The surface's own position control was dragged; the new position is
    /// reported upward
    pub fn scrub(&mut self, seconds: f64) -> Result<f64, DomainError> {
        if self.media.is_none() {
            return Err(DomainError::NoMediaSelected);
        }
        let position = self
            .surface
            .scrub(seconds)
            .ok_or_else(|| DomainError::BadArgs(format!("Cannot scrub to {}", seconds)))?;
        self.surface_time_changed(position);
        Ok(position)
    }

    /// Let playback run for `elapsed` seconds
    pub fn advance(&mut self, elapsed: f64) -> Option<f64> {
        let position = self.surface.advance(elapsed)?;
        self.surface_time_changed(position);
        Some(position)
    }

    /// Export the selected interval of the current file
    pub async fn export(&self) -> Result<ExportReport, DomainError> {
        let media = self.media.as_ref().ok_or(DomainError::NoMediaSelected)?;
        let range = self.range.as_ref().ok_or(DomainError::DurationUnknown)?;
        let request = TrimRequest::new(media.clone(), range.start_time(), range.end_time());
        self.export.export(request).await
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            file: self.media.as_ref().map(|m| m.name.clone()),
            range: self.range,
            mode: self.surface.mode(),
            exporting: self.export.is_exporting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local_host::LocalMediaHost;
    use crate::domain::model::{MediaHandle, TrimResponse, TrimResult};
    use crate::ports::{DownloadPort, ProbePort, TrimTransportPort};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Duration keyed by file name; unknown names fail
    struct NamedDurations(Vec<(&'static str, f64)>);

    #[async_trait]
    impl ProbePort for NamedDurations {
        async fn probe_duration(&self, media: &SelectedMedia) -> Result<f64, DomainError> {
            self.0
                .iter()
                .find(|(name, _)| *name == media.name)
                .map(|(_, d)| *d)
                .ok_or_else(|| DomainError::ProbeFail("no metadata".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        ranges: Mutex<Vec<(f64, f64)>>,
    }

    #[async_trait]
    impl TrimTransportPort for RecordingTransport {
        async fn send_trim(&self, request: &TrimRequest) -> Result<TrimResponse, DomainError> {
            self.ranges
                .lock()
                .unwrap()
                .push((request.start_time, request.end_time));
            Ok(TrimResponse {
                status: 200,
                content_disposition: Some("attachment; filename=cut.mp4".to_string()),
                content_type: None,
                body: b"cut".to_vec(),
            })
        }
    }

    struct NullDownload;

    #[async_trait]
    impl DownloadPort for NullDownload {
        async fn save(&self, result: TrimResult, _fallback: &str) -> Result<PathBuf, DomainError> {
            Ok(PathBuf::from(result.filename))
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        host: Arc<LocalMediaHost>,
        transport: Arc<RecordingTransport>,
        session: EditorSession,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.mov", "broken.mkv"] {
            std::fs::write(dir.path().join(name), b"data").unwrap();
        }
        let host = Arc::new(LocalMediaHost::new());
        let transport = Arc::new(RecordingTransport::default());
        let probe = Arc::new(ProbeInteractor::new(
            Arc::new(NamedDurations(vec![("a.mp4", 10.0), ("b.mov", 20.0)])),
            Duration::from_secs(1),
        ));
        let export = Arc::new(ExportInteractor::new(transport.clone(), Arc::new(NullDownload)));
        let session = EditorSession::new(host.clone(), probe, export);
        Fixture {
            dir,
            host,
            transport,
            session,
        }
    }

    #[tokio::test]
    async fn test_selection_initializes_range() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("a.mp4")).await.unwrap();

        let range = f.session.range().unwrap();
        assert_eq!(range.start_time(), 0.0);
        assert_eq!(range.end_time(), 10.0);
        assert!(range.duration() > 0.0);
        assert_eq!(f.host.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_second_selection_resets_state() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("a.mp4")).await.unwrap();
        f.session.change_control(ControlKind::Start, 2.0).unwrap();
        f.session.change_control(ControlKind::End, 8.0).unwrap();
        f.session.change_control(ControlKind::Playhead, 5.0).unwrap();

        f.session.select_media(f.dir.path().join("b.mov")).await.unwrap();

        assert_eq!(f.session.media().unwrap().name, "b.mov");
        let range = f.session.range().unwrap();
        assert_eq!(range.current_time(), 0.0);
        assert_eq!(range.start_time(), 0.0);
        assert_eq!(range.end_time(), 20.0);
        assert_eq!(range.duration(), 20.0);
        assert_eq!(f.session.surface().position(), 0.0);
        assert_eq!(f.host.live_handles(), 1);

        f.session.clear_media();
        assert_eq!(f.host.live_handles(), 0);
        assert_eq!(f.session.status().to_string(), "No video selected");
    }

    #[tokio::test]
    async fn test_rejected_file_keeps_current_selection() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("a.mp4")).await.unwrap();
        let err = f.session.select_media(f.dir.path().join("notes.txt")).await.unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
        assert_eq!(f.session.media().unwrap().name, "a.mp4");
    }

    #[tokio::test]
    async fn test_playhead_and_surface_stay_in_step() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("a.mp4")).await.unwrap();

        f.session.change_control(ControlKind::Playhead, 3.0).unwrap();
        assert_eq!(f.session.surface().position(), 3.0);

        f.session.play().unwrap();
        assert_eq!(f.session.advance(1.5), Some(4.5));
        assert_eq!(f.session.range().unwrap().current_time(), 4.5);

        f.session.advance(60.0);
        assert_eq!(f.session.range().unwrap().current_time(), 10.0);
        assert_eq!(f.session.surface().mode(), PlaybackMode::Paused);
    }

    #[tokio::test]
    async fn test_scrub_reports_position_upward() {
        let mut f = fixture();
        assert_eq!(f.session.scrub(1.0).unwrap_err(), DomainError::NoMediaSelected);
        f.session.select_media(f.dir.path().join("a.mp4")).await.unwrap();

        assert_eq!(f.session.scrub(6.25).unwrap(), 6.25);
        assert_eq!(f.session.range().unwrap().current_time(), 6.25);

        assert_eq!(f.session.scrub(42.0).unwrap(), 10.0);
        assert_eq!(f.session.range().unwrap().current_time(), 10.0);
        assert_eq!(f.session.scrub(-3.0).unwrap(), 0.0);
        assert_eq!(f.session.range().unwrap().current_time(), 0.0);

        // Range and surface agree, so following the range does not seek again
        f.session.scrub(3.5).unwrap();
        let current = f.session.range().unwrap().current_time();
        assert!(!f.session.surface.sync_to(current));
        assert_eq!(f.session.surface().position(), 3.5);

        assert!(matches!(f.session.scrub(f64::NAN), Err(DomainError::BadArgs(_))));
        assert_eq!(f.session.range().unwrap().current_time(), 3.5);
    }

    /// Refuses handles for files whose name starts with "locked"
    struct RefusingHost(LocalMediaHost);

    impl MediaHostPort for RefusingHost {
        fn open_handle(&self, media: &SelectedMedia) -> Result<MediaHandle, DomainError> {
            if media.name.starts_with("locked") {
                return Err(DomainError::FsFail(format!("Cannot open {}", media.name)));
            }
            self.0.open_handle(media)
        }

        fn live_handles(&self) -> usize {
            self.0.live_handles()
        }
    }

    #[tokio::test]
    async fn test_unopenable_file_keeps_current_selection() {
        let f = fixture();
        std::fs::write(f.dir.path().join("locked.mp4"), b"data").unwrap();
        let host = Arc::new(RefusingHost(LocalMediaHost::new()));
        let probe = Arc::new(ProbeInteractor::new(
            Arc::new(NamedDurations(vec![("a.mp4", 10.0), ("locked.mp4", 4.0)])),
            Duration::from_secs(1),
        ));
        let export = Arc::new(ExportInteractor::new(f.transport.clone(), Arc::new(NullDownload)));
        let mut session = EditorSession::new(host.clone(), probe, export);

        session.select_media(f.dir.path().join("a.mp4")).await.unwrap();
        session.change_control(ControlKind::Start, 2.0).unwrap();

        let err = session.select_media(f.dir.path().join("locked.mp4")).await.unwrap_err();
        assert!(matches!(err, DomainError::FsFail(_)));
        assert_eq!(session.media().unwrap().name, "a.mp4");
        assert_eq!(session.range().unwrap().start_time(), 2.0);
        assert!(session.surface().is_loaded());
        assert_eq!(host.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_unknown_duration_blocks_range_and_export() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("broken.mkv")).await.unwrap();

        assert!(f.session.range().is_none());
        assert_eq!(
            f.session.change_control(ControlKind::Start, 1.0).unwrap_err(),
            DomainError::DurationUnknown
        );
        assert_eq!(f.session.export().await.unwrap_err(), DomainError::DurationUnknown);
        assert!(f.session.status().to_string().contains("duration unknown"));
        assert!(f.transport.ranges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_requires_media() {
        let f = fixture();
        assert_eq!(f.session.export().await.unwrap_err(), DomainError::NoMediaSelected);
    }

    #[tokio::test]
    async fn test_export_sends_selected_interval() {
        let mut f = fixture();
        f.session.select_media(f.dir.path().join("b.mov")).await.unwrap();
        f.session.change_control(ControlKind::Start, 1.25).unwrap();
        f.session.change_control(ControlKind::End, 7.5).unwrap();

        let report = f.session.export().await.unwrap();
        assert_eq!(report.filename, "cut.mp4");
        assert_eq!(*f.transport.ranges.lock().unwrap(), vec![(1.25, 7.5)]);
    }
}
