// Export interactor - Validates a range, sends it to the trim backend and saves the result

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Clears the in-flight flag however the export ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Interactor for the trim-and-download use case
pub struct ExportInteractor {
    transport: Arc<dyn TrimTransportPort>,
    download: Arc<dyn DownloadPort>,
    in_flight: AtomicBool,
}

impl ExportInteractor {
    pub fn new(transport: Arc<dyn TrimTransportPort>, download: Arc<dyn DownloadPort>) -> Self {
        Self {
            transport,
            download,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a request is waiting on the backend
    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one export. Invalid ranges fail before anything is sent; a second
    /// export while one is in flight fails with `ExportInProgress`.
    pub async fn export(&self, request: TrimRequest) -> Result<ExportReport, DomainError> {
        if let Err(e) = RangeValidator::validate(request.start_time, request.end_time) {
            warn!(start = request.start_time, end = request.end_time, "{}", e);
            return Err(e);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(file = %request.media.name, "Export rejected, another is in flight");
            return Err(DomainError::ExportInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!(
            file = %request.media.name,
            start = request.start_time,
            end = request.end_time,
            "Sending trim request"
        );

        let result = match self.exchange(&request).await {
            Ok(result) => result,
            Err(e) => {
                error!(file = %request.media.name, "Export failed: {}", e);
                return Err(e);
            }
        };

        let content_type = result.content_type.clone();
        let bytes = result.bytes.len() as u64;
        let fallback = request.media.fallback_result_name();
        let saved_to = self.download.save(result, &fallback).await?;

        // Report the name the file actually got on disk
        let filename = saved_to
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(fallback);

        info!(file = %filename, path = %saved_to.display(), bytes, "Trimmed video saved");

        Ok(ExportReport {
            source: request.media.name.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            filename,
            saved_to,
            content_type,
            bytes,
            completed_at: Utc::now(),
        })
    }

    async fn exchange(&self, request: &TrimRequest) -> Result<TrimResult, DomainError> {
        let response = self.transport.send_trim(request).await?;
        interpret_response(&request.media, response)
    }
}
