use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

/// Write `content` next to `path` and rename it into place, so readers see
/// either the previous file or the complete new one.
///
/// Every call writes its own temp file, so concurrent writers to the same
/// path never share bytes; the last rename wins.
pub(crate) async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create dir failed: {}", dir.display()))?;
    }

    let tmp_path = temp_path_for(path);
    let result = write_then_rename(&tmp_path, path, content).await;
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_then_rename(tmp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    fs::write(tmp_path, content)
        .await
        .with_context(|| format!("write temp file failed: {}", tmp_path.display()))?;

    fs::rename(tmp_path, path).await.with_context(|| {
        format!(
            "rename temp file to target failed: {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })
}

/// `<dir>/.<name>.<uuid>.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
}
