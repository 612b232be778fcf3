use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use lt_core::ports::ProjectionChannelPort;
use lt_core::ProjectionSnapshot;

use super::NOTIFY_CAPACITY;

/// Process-local channel for surfaces sharing one process, and for tests.
pub struct InMemoryProjectionChannel {
    latest: RwLock<Option<ProjectionSnapshot>>,
    tx: broadcast::Sender<ProjectionSnapshot>,
}

impl InMemoryProjectionChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            latest: RwLock::new(None),
            tx,
        }
    }
}

impl Default for InMemoryProjectionChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectionChannelPort for InMemoryProjectionChannel {
    async fn publish(&self, snapshot: &ProjectionSnapshot) -> Result<()> {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        // No subscribers is not an error.
        let _ = self.tx.send(snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<ProjectionSnapshot>> {
        Ok(self
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProjectionSnapshot> {
        self.tx.subscribe()
    }
}
