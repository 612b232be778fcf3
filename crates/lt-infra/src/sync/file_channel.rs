use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use lt_core::ports::ProjectionChannelPort;
use lt_core::{ProjectionSnapshot, WriterEpoch};

use super::NOTIFY_CAPACITY;
use crate::fs::atomic_write;

const SNAPSHOT_FILE: &str = "projection/snapshot.json";

/// Channel shared between processes through `<root>/projection/snapshot.json`.
///
/// Publishes in this process notify subscribers directly. Publishes from
/// another process are picked up by [`FileProjectionChannel::spawn_watcher`].
pub struct FileProjectionChannel {
    path: PathBuf,
    tx: broadcast::Sender<ProjectionSnapshot>,
    notified: Arc<Notified>,
}

/// Newest `(epoch, seq)` already sent to subscribers from this process.
#[derive(Default)]
struct Notified(Mutex<(WriterEpoch, u64)>);

impl Notified {
    /// Record `snapshot` and return whether it is news: a later seq from the
    /// same writer, or any snapshot from a different writer.
    fn advance(&self, snapshot: &ProjectionSnapshot) -> bool {
        let mut last = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let (epoch, seq) = &mut *last;
        if *epoch == snapshot.epoch {
            if snapshot.seq <= *seq {
                return false;
            }
        } else {
            *epoch = snapshot.epoch.clone();
        }
        *seq = snapshot.seq;
        true
    }
}

impl FileProjectionChannel {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let (tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            path: root.as_ref().join(SNAPSHOT_FILE),
            tx,
            notified: Arc::new(Notified::default()),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.path
    }

    /// Poll the snapshot file and notify subscribers whenever a newer seq or
    /// a new writer epoch appears. Runs until the returned handle is aborted.
    pub fn spawn_watcher(&self, interval: Duration) -> JoinHandle<()> {
        let path = self.path.clone();
        let tx = self.tx.clone();
        let notified = self.notified.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match read_snapshot(&path).await {
                    Ok(Some(snapshot)) => {
                        if notified.advance(&snapshot) {
                            debug!(
                                epoch = %snapshot.epoch,
                                seq = snapshot.seq,
                                "external snapshot detected"
                            );
                            let _ = tx.send(snapshot);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "snapshot watcher read failed"),
                }
            }
        })
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<ProjectionSnapshot>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("read snapshot failed: {}", path.display()))
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed projection snapshot, ignoring");
            Ok(None)
        }
    }
}

#[async_trait]
impl ProjectionChannelPort for FileProjectionChannel {
    async fn publish(&self, snapshot: &ProjectionSnapshot) -> Result<()> {
        let content = serde_json::to_vec(snapshot).context("serialize snapshot failed")?;
        atomic_write(&self.path, &content).await?;

        self.notified.advance(snapshot);
        let _ = self.tx.send(snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<ProjectionSnapshot>> {
        read_snapshot(&self.path).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ProjectionSnapshot> {
        self.tx.subscribe()
    }
}
