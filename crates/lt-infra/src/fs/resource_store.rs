use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use lt_core::ports::ResourceStorePort;
use lt_core::{CacheEntry, ResourceId};

use super::atomic_write;

const RESOURCES_DIR: &str = "resources";

/// Durable Resource Store backed by one JSON file per key:
/// `<root>/resources/<key>.json`.
pub struct FsResourceStore {
    root: PathBuf,
}

impl FsResourceStore {
    /// Create a store rooted at `root`; nothing is touched on disk until the
    /// first `store`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, key: &ResourceId) -> Result<PathBuf> {
        if !key.is_storage_safe() {
            bail!("invalid resource key: {key:?}");
        }
        Ok(self
            .root
            .join(RESOURCES_DIR)
            .join(format!("{}.json", key.as_str())))
    }
}

#[async_trait]
impl ResourceStorePort for FsResourceStore {
    /// Missing files and undecodable entries both load as `None`.
    async fn load(&self, key: &ResourceId) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read cache entry failed: {}", path.display()))
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) if entry.key == *key => Ok(Some(entry)),
            Ok(entry) => {
                warn!(expected = %key, found = %entry.key, "cache entry key mismatch, ignoring");
                Ok(None)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "malformed cache entry, ignoring");
                Ok(None)
            }
        }
    }

    async fn store(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.key)?;
        let content = serde_json::to_vec(entry).context("serialize cache entry failed")?;
        atomic_write(&path, &content).await?;
        debug!(key = %entry.key, bytes = content.len(), "cache entry stored");
        Ok(())
    }
}
