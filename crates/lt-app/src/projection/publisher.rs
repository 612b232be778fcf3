use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lt_core::ports::ProjectionChannelPort;
use lt_core::ProjectionSnapshot;

/// Background worker draining snapshots queued by the projection store.
///
/// Publish failures are logged and dropped: the next publish rewrites the
/// durable snapshot, so at most one intermediate state is lost.
pub struct SnapshotPublisher {
    rx: mpsc::UnboundedReceiver<ProjectionSnapshot>,
    channel: Arc<dyn ProjectionChannelPort>,
}

impl SnapshotPublisher {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<ProjectionSnapshot>,
        channel: Arc<dyn ProjectionChannelPort>,
    ) -> Self {
        Self { rx, channel }
    }

    /// Runs until the owning store is dropped, publishing every queued snapshot.
    pub async fn run(mut self) {
        info!("snapshot publisher started");
        while let Some(snapshot) = self.rx.recv().await {
            self.publish(snapshot).await;
        }
        info!("snapshot publisher stopped");
    }

    /// Publish whatever is queued right now without waiting for more.
    pub async fn flush_pending(&mut self) -> usize {
        let mut published = 0;
        while let Ok(snapshot) = self.rx.try_recv() {
            self.publish(snapshot).await;
            published += 1;
        }
        published
    }

    async fn publish(&self, snapshot: ProjectionSnapshot) {
        match self.channel.publish(&snapshot).await {
            Ok(()) => debug!(seq = snapshot.seq, blackout = snapshot.blackout, "snapshot published"),
            Err(err) => warn!(seq = snapshot.seq, error = %err, "snapshot publish failed"),
        }
    }
}
