use async_trait::async_trait;

use crate::ids::ResourceId;
use crate::resource::CacheEntry;

/// Durable Resource Store: one entry per logical resource id, surviving restarts.
///
/// Requirements:
/// - `store` overwrites atomically; readers never observe a partial write
/// - `load` returns `Ok(None)` for a missing or undecodable entry; a corrupt
///   entry is treated as absent rather than failing the caller
#[async_trait]
pub trait ResourceStorePort: Send + Sync {
    async fn load(&self, key: &ResourceId) -> anyhow::Result<Option<CacheEntry>>;

    async fn store(&self, entry: &CacheEntry) -> anyhow::Result<()>;
}
