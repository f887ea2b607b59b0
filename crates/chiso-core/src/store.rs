//! In-memory avatar artifact store.
//!
//! Records live in two insertion-ordered collections, `generated` and
//! `pushed`, behind a single lock. State is memory-resident and
//! intentionally volatile; the backing video files under the outputs
//! directory are the only thing that survives a restart.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Lifecycle state of an avatar record.
///
/// `Generated --push--> Pushed`; delete is terminal from either state and
/// there is no way back from `Pushed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarState {
    Generated,
    Pushed,
}

/// Metadata for one synthesis job's output video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarRecord {
    pub id: String,
    /// Video filename relative to the outputs directory.
    pub filename: String,
    pub original_audio: String,
    pub original_media: String,
    pub created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<u64>,
}

impl AvatarRecord {
    pub fn new(filename: String, original_audio: String, original_media: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename,
            original_audio,
            original_media,
            created_at: unix_now(),
            pushed_at: None,
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[derive(Default)]
struct Collections {
    generated: Vec<AvatarRecord>,
    pushed: Vec<AvatarRecord>,
}

/// Owns the avatar collections; all access goes through these operations,
/// never through raw collection references. Reads return cloned snapshots.
pub struct ArtifactStore {
    outputs_dir: PathBuf,
    collections: RwLock<Collections>,
}

impl ArtifactStore {
    pub fn new(outputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            outputs_dir: outputs_dir.into(),
            collections: RwLock::new(Collections::default()),
        }
    }

    /// Append a freshly generated record.
    pub async fn add(&self, record: AvatarRecord) {
        let mut collections = self.collections.write().await;
        info!("stored avatar {} ({})", record.id, record.filename);
        collections.generated.push(record);
    }

    /// Snapshot of one collection, insertion order preserved.
    pub async fn list(&self, state: AvatarState) -> Vec<AvatarRecord> {
        let collections = self.collections.read().await;
        match state {
            AvatarState::Generated => collections.generated.clone(),
            AvatarState::Pushed => collections.pushed.clone(),
        }
    }

    /// Move a record from `generated` to `pushed`, stamping `pushed_at`.
    pub async fn push(&self, id: &str) -> Result<AvatarRecord> {
        let mut collections = self.collections.write().await;
        let index = collections
            .generated
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut record = collections.generated.remove(index);
        record.pushed_at = Some(unix_now());
        collections.pushed.push(record.clone());
        info!("avatar {} pushed", id);
        Ok(record)
    }

    /// Remove a record from whichever collection holds it and delete its
    /// backing file.
    ///
    /// The in-memory removal is not rolled back when the file removal
    /// fails; the caller sees `FileDeleteFailed` while the record is gone.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = {
            let mut collections = self.collections.write().await;
            if let Some(index) = collections.generated.iter().position(|r| r.id == id) {
                collections.generated.remove(index)
            } else if let Some(index) = collections.pushed.iter().position(|r| r.id == id) {
                collections.pushed.remove(index)
            } else {
                return Err(Error::NotFound(id.to_string()));
            }
        };

        let path = self.outputs_dir.join(&removed.filename);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|error| Error::FileDeleteFailed {
                    path: path.clone(),
                    reason: error.to_string(),
                })?;
            info!("avatar {} deleted with file {}", id, path.display());
        } else {
            warn!(
                "avatar {} had no backing file at {}",
                id,
                path.display()
            );
        }
        Ok(())
    }

    /// Generated/pushed sizes for health reporting.
    pub async fn counts(&self) -> (usize, usize) {
        let collections = self.collections.read().await;
        (collections.generated.len(), collections.pushed.len())
    }
}
