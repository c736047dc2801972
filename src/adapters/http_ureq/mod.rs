// HTTP transport adapter - Trim requests over ureq

pub mod multipart;

use std::fs::File;
use std::io::{Chain, Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::decimal_string;
use crate::ports::*;

pub use multipart::MultipartForm;

/// Form field carrying the file bytes
pub const VIDEO_FIELD: &str = "video";
/// Form field carrying the start of the interval
pub const START_FIELD: &str = "startTime";
/// Form field carrying the end of the interval
pub const END_FIELD: &str = "endTime";

/// Blocking ureq agent driven from the blocking pool
pub struct UreqTrimTransport {
    agent: ureq::Agent,
    endpoint: String,
}

impl UreqTrimTransport {
    /// Create a transport posting to `backend_url` + `trim_path`
    pub fn new(backend_url: &str, trim_path: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            endpoint: join_endpoint(backend_url, trim_path),
        }
    }
}

/// Join base URL and path with exactly one slash between them
pub fn join_endpoint(backend_url: &str, trim_path: &str) -> String {
    format!(
        "{}/{}",
        backend_url.trim_end_matches('/'),
        trim_path.trim_start_matches('/')
    )
}

/// Reads the encoded form with the file bytes pulled from disk in between
pub type BodyReader = Chain<Chain<Cursor<Vec<u8>>, File>, Cursor<Vec<u8>>>;

/// A form body ready to send without holding the file in memory
pub struct StreamedBody {
    pub content_type: String,
    pub len: u64,
    pub reader: BodyReader,
}

/// Open the file and lay out the three form parts in the order the backend
/// reads them
pub fn open_streamed_body(
    request: &TrimRequest,
    form: MultipartForm,
) -> Result<StreamedBody, DomainError> {
    let path = &request.media.path;
    let file = File::open(path)
        .map_err(|e| DomainError::FsFail(format!("Cannot read {}: {}", path.display(), e)))?;
    let file_len = file
        .metadata()
        .map_err(|e| DomainError::FsFail(format!("Cannot read {}: {}", path.display(), e)))?
        .len();

    let content_type = form.content_type();
    let boundary = form.boundary().to_string();
    let head = form
        .file_head(VIDEO_FIELD, &request.media.name, &request.media.mime_type)
        .into_bytes();
    let tail = MultipartForm::with_boundary(boundary)
        .end_file()
        .text(START_FIELD, &decimal_string(request.start_time))
        .text(END_FIELD, &decimal_string(request.end_time))
        .finish();

    let len = head.len() as u64 + file_len + tail.len() as u64;
    Ok(StreamedBody {
        content_type,
        len,
        reader: Cursor::new(head).chain(file).chain(Cursor::new(tail)),
    })
}

fn post_form(
    agent: &ureq::Agent,
    endpoint: &str,
    body: StreamedBody,
) -> Result<TrimResponse, DomainError> {
    let mut response = agent
        .post(endpoint)
        .header("Content-Type", &body.content_type)
        .send(ureq::SendBody::from_owned_reader(body.reader))
        .map_err(|e| DomainError::Transport(e.to_string()))?;

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_disposition = header("content-disposition");
    let content_type = header("content-type");
    let status = response.status().as_u16();

    let mut bytes = Vec::new();
    response
        .body_mut()
        .as_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DomainError::Transport(format!("Reading response body failed: {}", e)))?;

    Ok(TrimResponse {
        status,
        content_disposition,
        content_type,
        body: bytes,
    })
}

#[async_trait]
impl TrimTransportPort for UreqTrimTransport {
    async fn send_trim(&self, request: &TrimRequest) -> Result<TrimResponse, DomainError> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let request = request.clone();

        let response = tokio::task::spawn_blocking(move || {
            let body = open_streamed_body(&request, MultipartForm::new())?;
            info!(
                endpoint = %endpoint,
                file = %request.media.name,
                start = request.start_time,
                end = request.end_time,
                body_bytes = body.len,
                "Sending trim request"
            );
            post_form(&agent, &endpoint, body)
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("Transport task failed: {}", e)))??;

        debug!(
            status = response.status,
            body_bytes = response.body.len(),
            disposition = ?response.content_disposition,
            "Trim response received"
        );
        Ok(response)
    }
}
