// File system download adapter - Saves trimmed media into a download directory

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{numbered_name, sanitize_download_name};
use crate::ports::*;

/// Highest `name (N).ext` tried before giving up
const MAX_NUMBERED_NAMES: u32 = 999;

/// Download sink writing into one directory
pub struct FsDownloadAdapter {
    dir: PathBuf,
    overwrite: bool,
}

impl FsDownloadAdapter {
    /// Create a sink for `dir`; existing files are kept unless `overwrite`
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
        }
    }
}

fn fs_err(context: &str, e: std::io::Error) -> DomainError {
    DomainError::FsFail(format!("{}: {}", context, e))
}

/// Write to a temp file in `dir`, then move it into place under `name`
fn write_atomically(
    dir: &Path,
    name: &str,
    bytes: &[u8],
    overwrite: bool,
) -> Result<PathBuf, DomainError> {
    std::fs::create_dir_all(dir).map_err(|e| fs_err("Cannot create download directory", e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| fs_err("Cannot create temp file", e))?;
    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .map_err(|e| fs_err("Cannot write download", e))?;

    if overwrite {
        let target = dir.join(name);
        temp.persist(&target)
            .map_err(|e| fs_err("Cannot move download into place", e.error))?;
        return Ok(target);
    }

    let mut n = 0;
    loop {
        let candidate = if n == 0 {
            name.to_string()
        } else {
            numbered_name(name, n)
        };
        let target = dir.join(candidate);
        match temp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists && n < MAX_NUMBERED_NAMES => {
                temp = e.file;
                n += 1;
            }
            Err(e) => return Err(fs_err("Cannot move download into place", e.error)),
        }
    }
}

#[async_trait]
impl DownloadPort for FsDownloadAdapter {
    async fn save(&self, result: TrimResult, fallback_name: &str) -> Result<PathBuf, DomainError> {
        let name = sanitize_download_name(&result.filename, fallback_name);
        let dir = self.dir.clone();
        let overwrite = self.overwrite;
        let size = result.bytes.len();

        let saved = tokio::task::spawn_blocking(move || {
            write_atomically(&dir, &name, &result.bytes, overwrite)
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("Download task failed: {}", e)))??;

        info!(path = %saved.display(), bytes = size, "Download saved");
        Ok(saved)
    }
}
