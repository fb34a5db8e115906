//! Single-file JSON snapshot store.
//!
//! The durable unit is one pretty-printed JSON array of enriched
//! contributors at a fixed path — a single-slot cache with no history.
//! Writes go through a temp file in the same directory and a rename, so a
//! reader never observes a half-written document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use contribsync_shared::{ContribSyncError, EnrichedContributor, Result, Snapshot};

/// Handle to the snapshot file consumed by the docs site.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store for the given snapshot location. Nothing is touched
    /// on disk until [`read`](Self::read) or [`write`](Self::write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot has ever been written here.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the stored snapshot.
    ///
    /// Fails with `NotFound` if nothing was ever written, `Decode` if the
    /// document is corrupt, and `Io` for any other read failure.
    pub async fn read(&self) -> Result<Snapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ContribSyncError::NotFound {
                    path: self.path.clone(),
                },
                _ => ContribSyncError::io(&self.path, e),
            })?;

        let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
            ContribSyncError::decode(format!("corrupt snapshot {}: {e}", self.path.display()))
        })?;

        debug!(count = snapshot.len(), path = %self.path.display(), "snapshot read");
        Ok(snapshot)
    }

    /// Write a snapshot, replacing any previous one.
    ///
    /// The document lands via temp-file-then-rename so the previous
    /// snapshot stays intact if the write fails partway.
    pub async fn write(&self, snapshot: &[EnrichedContributor]) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            ContribSyncError::decode(format!("snapshot serialization failed: {e}"))
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ContribSyncError::io(parent, e))?;
            }
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ContribSyncError::io(
                    &self.path,
                    std::io::Error::new(ErrorKind::InvalidInput, "snapshot path has no file name"),
                )
            })?;
        let temp = self.path.with_file_name(format!(".{file_name}.tmp"));

        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| ContribSyncError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| ContribSyncError::io(&self.path, e))?;

        info!(count = snapshot.len(), path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
