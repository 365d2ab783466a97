//! Artifact lifecycle: uuid-named output files with a time-to-live.
//!
//! The request path only ever asks for a fresh path; retention and
//! deletion belong to a background sweeper whose failure or delay cannot
//! affect solving or plotting.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    ttl: Duration,
}

impl ArtifactStore {
    /// Open (creating if needed) an artifact directory with the given TTL.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(ArtifactStore { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A fresh, collision-free path for a new artifact. The file is not
    /// created here; the renderer writes it.
    pub fn allocate(&self, extension: &str) -> PathBuf {
        self.dir
            .join(format!("graph_{}.{extension}", Uuid::new_v4().simple()))
    }

    /// Delete artifacts older than the TTL. Returns how many were removed.
    pub fn sweep(&self) -> io::Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let expired = now
                .duration_since(modified)
                .map(|age| age >= self.ttl)
                .unwrap_or(false);
            if expired {
                match std::fs::remove_file(entry.path()) {
                    Ok(()) => {
                        debug!("removed expired artifact {:?}", entry.path());
                        removed += 1;
                    }
                    Err(err) => warn!("failed to remove {:?}: {err}", entry.path()),
                }
            }
        }
        Ok(removed)
    }

    /// Start the detached background sweeper. Best effort by design: a
    /// failed sweep is logged and retried on the next tick.
    pub fn start_sweeper(&self) {
        let store = self.clone();
        let interval = store.ttl.min(Duration::from_secs(30)).max(Duration::from_secs(1));
        thread::spawn(move || loop {
            thread::sleep(interval);
            if let Err(err) = store.sweep() {
                warn!("artifact sweep failed: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn allocated_paths_are_unique_and_inside_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ArtifactStore::new(dir.path(), Duration::from_secs(300)).expect("store");
        let a = store.allocate("png");
        let b = store.allocate("png");
        assert_ne!(a, b);
        assert!(a.starts_with(dir.path()));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn sweep_removes_only_expired_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ArtifactStore::new(dir.path(), Duration::ZERO).expect("store");
        let stale = store.allocate("png");
        fs::write(&stale, b"png").expect("write");

        // TTL zero: everything already written has expired.
        let removed = store.sweep().expect("sweep");
        assert_eq!(removed, 1);
        assert!(!stale.exists());

        let fresh_store = ArtifactStore::new(dir.path(), Duration::from_secs(3600)).expect("store");
        let fresh = fresh_store.allocate("png");
        fs::write(&fresh, b"png").expect("write");
        assert_eq!(fresh_store.sweep().expect("sweep"), 0);
        assert!(fresh.exists());
    }
}
