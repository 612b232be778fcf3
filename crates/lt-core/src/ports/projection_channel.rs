use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::projection::ProjectionSnapshot;

/// Cross-Surface Sync Channel: durable last-value store plus change notification.
///
/// The control surface is the only writer. Projector surfaces subscribe and read
/// the durable snapshot so that a surface attaching late still hydrates to the
/// latest published state.
#[async_trait]
pub trait ProjectionChannelPort: Send + Sync {
    /// Persist `snapshot` as the durable last value, then notify subscribers.
    /// Notification is best effort.
    async fn publish(&self, snapshot: &ProjectionSnapshot) -> anyhow::Result<()>;

    /// Latest durable snapshot, `None` if nothing was ever published.
    async fn load_snapshot(&self) -> anyhow::Result<Option<ProjectionSnapshot>>;

    /// Change notifications in publish order.
    fn subscribe(&self) -> broadcast::Receiver<ProjectionSnapshot>;
}
