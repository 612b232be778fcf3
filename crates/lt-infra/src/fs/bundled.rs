use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use lt_core::ports::BundledDatasetPort;
use lt_core::resource::{normalize, parse_payload};
use lt_core::{ResourceId, ResourceKind, ResourcePack};

/// Bundled datasets shipped as `<dir>/<resource_id>.json`, in any source shape
/// the normalizer accepts.
pub struct FsBundledDatasets {
    dir: PathBuf,
}

impl FsBundledDatasets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BundledDatasetPort for FsBundledDatasets {
    async fn load(&self, id: &ResourceId, kind: ResourceKind) -> Result<Option<ResourcePack>> {
        if !id.is_storage_safe() {
            return Ok(None);
        }
        let path = self.dir.join(format!("{}.json", id.as_str()));
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read bundled dataset failed: {}", path.display()))
            }
        };

        let value = match parse_payload(&text) {
            Ok(value) => value,
            Err(reason) => {
                warn!(resource_id = %id, %reason, "bundled dataset is not parseable, ignoring");
                return Ok(None);
            }
        };

        match normalize(kind, id, &value) {
            Ok(pack) => Ok(Some(pack)),
            Err(err) => {
                warn!(resource_id = %id, error = %err, "bundled dataset has no valid records, ignoring");
                Ok(None)
            }
        }
    }
}
