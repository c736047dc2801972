// Probe interactor - Resolves a selected file's duration with a timeout

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// What the `probe` command prints
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub mime_type: String,
    /// Seconds; absent when the duration never resolved
    pub duration: Option<f64>,
    pub duration_display: Option<String>,
}

/// Interactor for duration probing
pub struct ProbeInteractor {
    probe_port: Arc<dyn ProbePort>,
    timeout: Duration,
}

impl ProbeInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>, timeout: Duration) -> Self {
        Self {
            probe_port,
            timeout,
        }
    }

    /// Duration if it resolves in time; failures are logged, never returned
    pub async fn resolve_duration(&self, media: &SelectedMedia) -> Option<f64> {
        match tokio::time::timeout(self.timeout, self.probe_port.probe_duration(media)).await {
            Ok(Ok(duration)) if duration.is_finite() && duration > 0.0 => {
                info!(file = %media.name, duration, "Duration resolved");
                Some(duration)
            }
            Ok(Ok(duration)) => {
                warn!(file = %media.name, duration, "Probe reported an unusable duration");
                None
            }
            Ok(Err(e)) => {
                warn!(file = %media.name, error = %e, "Duration unknown");
                None
            }
            Err(_) => {
                warn!(
                    file = %media.name,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Duration probe timed out"
                );
                None
            }
        }
    }

    /// Probe and describe a file
    pub async fn inspect(&self, media: &SelectedMedia) -> ProbeReport {
        let duration = self.resolve_duration(media).await;
        ProbeReport {
            name: media.name.clone(),
            path: media.path.display().to_string(),
            size: media.size,
            mime_type: media.mime_type.clone(),
            duration,
            duration_display: duration.map(|d| TimeSpec::from_seconds(d).format_clock()),
        }
    }

    /// Render a report in the requested format
    pub fn format_report(report: &ProbeReport, format: &str) -> Result<String, DomainError> {
        match format {
            "json" => serde_json::to_string_pretty(report)
                .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e))),
            "yaml" => serde_yaml::to_string(report)
                .map_err(|e| DomainError::InternalError(format!("YAML serialization failed: {}", e))),
            "text" => Ok(Self::format_as_text(report)),
            other => Err(DomainError::BadArgs(format!(
                "Unknown output format: {} (expected text, json or yaml)",
                other
            ))),
        }
    }

    fn format_as_text(report: &ProbeReport) -> String {
        let mut output = String::new();
        output.push_str("Media File Information:\n");
        output.push_str(&format!("  File: {}\n", report.path));
        output.push_str(&format!("  Type: {}\n", report.mime_type));
        output.push_str(&format!(
            "  Size: {}\n",
            crate::utils::format_file_size(report.size)
        ));
        match (&report.duration, &report.duration_display) {
            (Some(seconds), Some(display)) => {
                output.push_str(&format!("  Duration: {} ({:.3}s)\n", display, seconds))
            }
            _ => output.push_str("  Duration: unknown\n"),
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct FixedProbe(Result<f64, DomainError>);

    #[async_trait]
    impl ProbePort for FixedProbe {
        async fn probe_duration(&self, _media: &SelectedMedia) -> Result<f64, DomainError> {
            self.0.clone()
        }
    }

    struct StuckProbe;

    #[async_trait]
    impl ProbePort for StuckProbe {
        async fn probe_duration(&self, _media: &SelectedMedia) -> Result<f64, DomainError> {
            std::future::pending().await
        }
    }

    fn media() -> SelectedMedia {
        SelectedMedia {
            name: "a.mp4".to_string(),
            size: 2048,
            mime_type: "video/mp4".to_string(),
            path: PathBuf::from("/videos/a.mp4"),
        }
    }

    fn interactor(probe: impl ProbePort + 'static) -> ProbeInteractor {
        ProbeInteractor::new(Arc::new(probe), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_resolves_positive_duration() {
        assert_eq!(interactor(FixedProbe(Ok(12.5))).resolve_duration(&media()).await, Some(12.5));
    }

    #[tokio::test]
    async fn test_failures_leave_duration_unknown() {
        let failing = FixedProbe(Err(DomainError::ProbeFail("bad".to_string())));
        assert_eq!(interactor(failing).resolve_duration(&media()).await, None);
        assert_eq!(interactor(FixedProbe(Ok(0.0))).resolve_duration(&media()).await, None);
        assert_eq!(interactor(FixedProbe(Ok(f64::NAN))).resolve_duration(&media()).await, None);
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        assert_eq!(interactor(StuckProbe).resolve_duration(&media()).await, None);
    }

    #[tokio::test]
    async fn test_report_formats() {
        let report = interactor(FixedProbe(Ok(90.5))).inspect(&media()).await;
        assert_eq!(report.duration_display.as_deref(), Some("1:30.500"));

        let text = ProbeInteractor::format_report(&report, "text").unwrap();
        assert!(text.contains("Duration: 1:30.500 (90.500s)"));
        assert!(text.contains("Size: 2.00 KB"));

        let json = ProbeInteractor::format_report(&report, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["duration"], 90.5);
        assert_eq!(value["mime_type"], "video/mp4");

        assert!(ProbeInteractor::format_report(&report, "yaml").unwrap().contains("name: a.mp4"));
        assert!(ProbeInteractor::format_report(&report, "xml").is_err());
    }
}
