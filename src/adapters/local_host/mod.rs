// Local media host adapter - Transient file references for playback and probing

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Registry of live handles on the local file system
#[derive(Default)]
pub struct LocalMediaHost {
    next_id: AtomicU64,
    live: Arc<Mutex<HashSet<u64>>>,
}

impl LocalMediaHost {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaHostPort for LocalMediaHost {
    fn open_handle(&self, media: &SelectedMedia) -> Result<MediaHandle, DomainError> {
        // Confirm the bytes are still reachable before handing out a reference
        std::fs::File::open(&media.path).map_err(|e| {
            DomainError::FsFail(format!("Cannot open {}: {}", media.path.display(), e))
        })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id);
        debug!(handle = id, file = %media.name, "Media handle opened");

        let live = Arc::clone(&self.live);
        Ok(MediaHandle::new(id, media.path.clone(), move |id| {
            live.lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(&id);
            trace!(handle = id, "Media handle released");
        }))
    }

    fn live_handles(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_in(dir: &tempfile::TempDir, name: &str) -> SelectedMedia {
        let path = dir.path().join(name);
        std::fs::write(&path, b"bytes").unwrap();
        SelectedMedia::from_path(path).unwrap()
    }

    #[test]
    fn test_handles_are_counted_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let media = media_in(&dir, "a.mp4");
        let host = LocalMediaHost::new();

        let first = host.open_handle(&media).unwrap();
        let second = host.open_handle(&media).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(host.live_handles(), 2);

        drop(first);
        assert_eq!(host.live_handles(), 1);
        drop(second);
        assert_eq!(host.live_handles(), 0);
    }

    #[test]
    fn test_open_fails_when_file_vanished() {
        let dir = tempfile::tempdir().unwrap();
        let media = media_in(&dir, "gone.mkv");
        std::fs::remove_file(&media.path).unwrap();

        let host = LocalMediaHost::new();
        assert!(matches!(host.open_handle(&media), Err(DomainError::FsFail(_))));
        assert_eq!(host.live_handles(), 0);
    }
}
