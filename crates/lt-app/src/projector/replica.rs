use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use lt_core::ports::ProjectionChannelPort;
use lt_core::{render, Frame, ProjectionSnapshot, SurfaceId};

/// Read-only replica of the projection, rendered as a [`Frame`].
///
/// Attaching subscribes first and then hydrates from the durable snapshot, so
/// a projector opened after N publishes shows publish N even if nothing else
/// is ever published. Snapshots from the same writer epoch are applied by
/// `seq`: older ones are dropped and a repeat of the applied one is a no-op.
/// A snapshot from another epoch means the control surface restarted, and
/// seq ordering starts over from it.
pub struct ProjectorReplica {
    surface_id: SurfaceId,
    channel: Arc<dyn ProjectionChannelPort>,
    rx: broadcast::Receiver<ProjectionSnapshot>,
    applied: ProjectionSnapshot,
    frame: Frame,
}

impl ProjectorReplica {
    pub async fn attach(channel: Arc<dyn ProjectionChannelPort>) -> Result<Self> {
        let rx = channel.subscribe();
        let applied = ProjectionSnapshot::initial();
        let mut replica = Self {
            surface_id: SurfaceId::new(),
            frame: render(&applied),
            applied,
            channel,
            rx,
        };
        replica.hydrate().await?;
        info!(
            surface_id = %replica.surface_id,
            seq = replica.applied.seq,
            "projector attached"
        );
        Ok(replica)
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied.seq
    }

    /// Apply one replicated snapshot. Returns whether the rendered frame changed.
    pub fn apply(&mut self, snapshot: ProjectionSnapshot) -> bool {
        if snapshot.same_writer(&self.applied) {
            if snapshot.seq < self.applied.seq {
                debug!(seq = snapshot.seq, applied = self.applied.seq, "stale snapshot dropped");
                return false;
            }
            if snapshot.seq == self.applied.seq && snapshot.same_payload(&self.applied) {
                return false;
            }
        } else {
            info!(
                surface_id = %self.surface_id,
                epoch = %snapshot.epoch,
                seq = snapshot.seq,
                "following new writer epoch"
            );
        }

        let frame = render(&snapshot);
        let changed = frame != self.frame;
        self.applied = snapshot;
        self.frame = frame;
        changed
    }

    /// Re-read the durable snapshot.
    pub async fn hydrate(&mut self) -> Result<bool> {
        let snapshot = self
            .channel
            .load_snapshot()
            .await
            .context("failed to read durable projection snapshot")?;
        Ok(snapshot.is_some_and(|s| self.apply(s)))
    }

    /// A notification from another epoch may have been queued before a newer
    /// writer replaced the durable snapshot. The durable snapshot decides
    /// which writer is current; notifications from that writer are still
    /// applied one by one so none is skipped.
    async fn switch_writer(&mut self, notified: ProjectionSnapshot) -> Result<bool> {
        let latest = self
            .channel
            .load_snapshot()
            .await
            .context("failed to read durable projection snapshot")?;
        match latest {
            Some(latest) if !latest.same_writer(&notified) => {
                debug!(
                    surface_id = %self.surface_id,
                    epoch = %notified.epoch,
                    "notification from a replaced writer, using durable snapshot"
                );
                Ok(self.apply(latest))
            }
            _ => Ok(self.apply(notified)),
        }
    }

    /// Wait for the next notification that changes the frame. `None` once
    /// the channel is closed.
    pub async fn next_frame(&mut self) -> Result<Option<&Frame>> {
        loop {
            match self.rx.recv().await {
                Ok(snapshot) => {
                    let changed = if snapshot.same_writer(&self.applied) {
                        self.apply(snapshot)
                    } else {
                        self.switch_writer(snapshot).await?
                    };
                    if changed {
                        return Ok(Some(&self.frame));
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(surface_id = %self.surface_id, missed, "projector lagged, re-hydrating");
                    if self.hydrate().await? {
                        return Ok(Some(&self.frame));
                    }
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }

    /// Render loop: report the current frame, then every change until the
    /// channel closes.
    pub async fn run<F>(mut self, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&Frame),
    {
        on_frame(&self.frame);
        while let Some(frame) = self.next_frame().await? {
            on_frame(frame);
        }
        info!(surface_id = %self.surface_id, "projector channel closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_core::{DisplaySettings, ProjectionKind, ProjectionState, WriterEpoch};
    use lt_infra::InMemoryProjectionChannel;

    fn snapshot(seq: u64, projection: ProjectionState) -> ProjectionSnapshot {
        snapshot_in(&WriterEpoch::from("run-1"), seq, projection)
    }

    fn snapshot_in(epoch: &WriterEpoch, seq: u64, projection: ProjectionState) -> ProjectionSnapshot {
        ProjectionSnapshot {
            epoch: epoch.clone(),
            seq,
            projection,
            settings: DisplaySettings::default(),
            blackout: false,
        }
    }

    async fn replica() -> ProjectorReplica {
        ProjectorReplica::attach(Arc::new(InMemoryProjectionChannel::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn starts_on_welcome_when_nothing_published() {
        let replica = replica().await;
        assert_eq!(replica.applied_seq(), 0);
        assert!(matches!(replica.frame(), Frame::Welcome { .. }));
    }

    #[tokio::test]
    async fn applying_twice_equals_applying_once() {
        let mut replica = replica().await;
        let s = snapshot(1, ProjectionState::text("Porque Deus amou", "João 3:16"));

        assert!(replica.apply(s.clone()));
        let once = replica.frame().clone();
        assert!(!replica.apply(s));
        assert_eq!(replica.frame(), &once);
    }

    #[tokio::test]
    async fn stale_snapshots_are_dropped() {
        let mut replica = replica().await;
        replica.apply(snapshot(5, ProjectionState::lyric("Estrofe 5", "1. Graça")));

        assert!(!replica.apply(snapshot(4, ProjectionState::lyric("Estrofe 4", "1. Graça"))));
        match replica.frame() {
            Frame::Text { kind, content, .. } => {
                assert_eq!(*kind, ProjectionKind::Lyric);
                assert_eq!(content, "Estrofe 5");
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[tokio::test]
    async fn newer_snapshot_with_same_frame_is_not_a_change() {
        let mut replica = replica().await;
        let state = ProjectionState::text("Amém", "");
        assert!(replica.apply(snapshot(1, state.clone())));
        assert!(!replica.apply(snapshot(2, state)));
        assert_eq!(replica.applied_seq(), 2);
    }

    #[tokio::test]
    async fn restarted_writer_with_lower_seq_is_followed() {
        let mut replica = replica().await;
        replica.apply(snapshot(40, ProjectionState::lyric("Estrofe 3", "1. Graça")));

        let restarted = WriterEpoch::from("run-2");
        assert!(replica.apply(snapshot_in(&restarted, 1, ProjectionState::idle())));
        assert!(matches!(replica.frame(), Frame::Welcome { .. }));
        assert_eq!(replica.applied_seq(), 1);

        assert!(replica.apply(snapshot_in(
            &restarted,
            2,
            ProjectionState::text("Salmo 23", "Salmos 23:1")
        )));
        assert!(!replica.apply(snapshot_in(&restarted, 1, ProjectionState::idle())));
    }

    #[tokio::test]
    async fn notification_from_new_epoch_defers_to_durable_snapshot() {
        let channel = Arc::new(InMemoryProjectionChannel::new());
        let mut replica = ProjectorReplica::attach(channel.clone()).await.unwrap();
        let old = WriterEpoch::from("run-1");
        let new = WriterEpoch::from("run-2");

        // The old writer's last publish is still queued when the new writer
        // has already replaced the durable snapshot.
        channel
            .publish(&snapshot_in(&old, 30, ProjectionState::text("antigo", "")))
            .await
            .unwrap();
        channel
            .publish(&snapshot_in(&new, 2, ProjectionState::text("novo", "")))
            .await
            .unwrap();

        let frame = replica.next_frame().await.unwrap().unwrap().clone();
        match frame {
            Frame::Text { content, .. } => assert_eq!(content, "novo"),
            other => panic!("unexpected frame {other:?}"),
        }
        // The queued "novo" notification is now a duplicate.
        assert!(!replica.apply(snapshot_in(&new, 2, ProjectionState::text("novo", ""))));
    }
}
