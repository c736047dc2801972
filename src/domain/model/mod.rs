// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;

/// Container extensions accepted at selection, with the MIME type sent for each
pub const ACCEPTED_VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
];

/// Content type assumed for a trimmed payload when the backend does not say
pub const DEFAULT_RESULT_CONTENT_TYPE: &str = "video/mp4";

/// Prefix used to name a result when the backend suggests no filename
pub const TRIMMED_PREFIX: &str = "trimmed_";

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() == 2 {
            // MM:SS.ms format
            let minutes = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
            let seconds_part = parts[1]
                .parse::<f64>()
                .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;

            if !(0.0..60.0).contains(&seconds_part) {
                return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
            }

            Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds_part))
        } else if parts.len() == 3 {
            // HH:MM:SS.ms format
            let hours = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid hours format".to_string()))?;
            let minutes = parts[1]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
            let seconds_part = parts[2]
                .parse::<f64>()
                .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;

            if minutes >= 60 {
                return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
            }
            if !(0.0..60.0).contains(&seconds_part) {
                return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
            }

            Ok(Self::from_seconds(
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds_part,
            ))
        } else {
            Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)".to_string()
            ))
        }
    }

    /// Format as `m:ss.mmm`; minutes keep counting past the hour
    pub fn format_clock(&self) -> String {
        let minutes = (self.seconds / 60.0).floor() as u64;
        let seconds = (self.seconds % 60.0).floor() as u64;
        let milliseconds = ((self.seconds % 1.0) * 1000.0).floor() as u64;
        format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_clock())
    }
}

/// A user-chosen file. Bytes stay on disk until a request needs them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedMedia {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub path: PathBuf,
}

impl SelectedMedia {
    /// Select a file from disk, checking it is one of the accepted containers
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|_| DomainError::FileNotFound(path.display().to_string()))?;
        if !metadata.is_file() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::BadArgs(format!("Not a file path: {}", path.display())))?;

        let mime_type = mime_type_for(path).ok_or_else(|| {
            DomainError::UnsupportedFormat(format!(
                "{} (accepted: {})",
                name,
                ACCEPTED_VIDEO_TYPES
                    .iter()
                    .map(|(ext, _)| format!(".{}", ext))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type: mime_type.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Name offered for a result when the backend suggests none
    pub fn fallback_result_name(&self) -> String {
        format!("{}{}", TRIMMED_PREFIX, self.name)
    }
}

/// Look up the MIME type for an accepted container extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED_VIDEO_TYPES
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
}

/// Duration, playhead and trim points for one loaded file.
///
/// Setters write through unchecked; the range selector clamps values into
/// `0 <= start <= end <= duration` and `0 <= current <= duration` before
/// calling them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    duration: f64,
    current_time: f64,
    start_time: f64,
    end_time: f64,
}

impl TimeRange {
    /// Initial state once the duration is known: whole file selected
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            current_time: 0.0,
            start_time: 0.0,
            end_time: duration,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    pub fn set_start_time(&mut self, seconds: f64) {
        self.start_time = seconds;
    }

    pub fn set_end_time(&mut self, seconds: f64) {
        self.end_time = seconds;
    }

    /// Check the ordering invariants
    pub fn is_consistent(&self) -> bool {
        0.0 <= self.start_time
            && self.start_time <= self.end_time
            && self.end_time <= self.duration
            && 0.0 <= self.current_time
            && self.current_time <= self.duration
    }

    /// Length of the selected interval
    pub fn selection_length(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

type ReleaseFn = Box<dyn FnOnce(u64) + Send + Sync>;

/// Owned transient reference to a file's bytes, released exactly once on drop
pub struct MediaHandle {
    id: u64,
    path: PathBuf,
    release: Option<ReleaseFn>,
}

impl MediaHandle {
    pub fn new(id: u64, path: PathBuf, release: impl FnOnce(u64) + Send + Sync + 'static) -> Self {
        Self {
            id,
            path,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaHandle")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

/// One export: the file plus the interval to cut out of it
#[derive(Debug, Clone, PartialEq)]
pub struct TrimRequest {
    pub media: SelectedMedia,
    pub start_time: f64,
    pub end_time: f64,
}

impl TrimRequest {
    pub fn new(media: SelectedMedia, start_time: f64, end_time: f64) -> Self {
        Self {
            media,
            start_time,
            end_time,
        }
    }
}

/// Raw backend answer, before it is judged a success or a failure
#[derive(Debug, Clone, PartialEq)]
pub struct TrimResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TrimResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trimmed media ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct TrimResult {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What an export produced, for display after the result itself is gone
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub source: String,
    pub start_time: f64,
    pub end_time: f64,
    pub filename: String,
    pub saved_to: PathBuf,
    pub content_type: String,
    pub bytes: u64,
    pub completed_at: DateTime<Utc>,
}
