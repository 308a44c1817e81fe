//! Checkpoint persistence port.
//!
//! The host owns checkpoint storage: a single named slot holding an
//! opaque timestamp string. The poller reads it at cycle start and
//! overwrites it once the batch is built. The host must not run two
//! cycles against the same slot at once.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::GatewayResult;
use crate::domain::models::Checkpoint;

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Read the slot; `None` on the very first run.
    async fn load(&self) -> GatewayResult<Option<Checkpoint>>;

    /// Overwrite the slot.
    async fn save(&self, checkpoint: &Checkpoint) -> GatewayResult<()>;
}

/// Checkpoint store that keeps the slot in memory.
///
/// Used by tests and by hosts that persist the value themselves.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    slot: Mutex<Option<Checkpoint>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            slot: Mutex::new(Some(checkpoint)),
        }
    }

    /// Current slot contents.
    pub async fn current(&self) -> Option<Checkpoint> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self) -> GatewayResult<Option<Checkpoint>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, checkpoint: &Checkpoint) -> GatewayResult<()> {
        *self.slot.lock().await = Some(checkpoint.clone());
        Ok(())
    }
}
