use async_trait::async_trait;

use crate::ids::ResourceId;
use crate::resource::{ResourceKind, ResourcePack};

/// Datasets shipped with the application.
#[async_trait]
pub trait BundledDatasetPort: Send + Sync {
    /// `Ok(None)` when nothing is bundled for `id`, or the bundled file is
    /// malformed.
    async fn load(&self, id: &ResourceId, kind: ResourceKind) -> anyhow::Result<Option<ResourcePack>>;
}
