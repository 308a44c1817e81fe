//! File-backed checkpoint store.
//!
//! The slot is a small JSON document, `{"time": "YYYY-MM-DD HH:MM:SS"}`,
//! rewritten in full on every save.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::Checkpoint;
use crate::domain::ports::CheckpointStore;

#[derive(Debug, Serialize, Deserialize)]
struct LastRun {
    time: Checkpoint,
}

/// Keeps the poll checkpoint in a JSON file between CLI invocations
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn load(&self) -> GatewayResult<Option<Checkpoint>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GatewayError::Io(format!(
                    "Failed to read checkpoint {}: {e}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let last_run: LastRun = serde_json::from_str(&raw)?;
        Ok(Some(last_run.time))
    }

    async fn save(&self, checkpoint: &Checkpoint) -> GatewayResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_string_pretty(&LastRun {
            time: checkpoint.clone(),
        })?;
        tokio::fs::write(&self.path, body).await?;

        tracing::debug!(path = %self.path.display(), checkpoint = %checkpoint, "checkpoint saved");
        Ok(())
    }
}
