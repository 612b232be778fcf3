//! Autoplay: advance the active sequence on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::projection::ProjectionStore;

/// Why an autoplay run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayNotice {
    /// The active sequence has no `advance` handler left.
    EndOfSequence,
    /// Stopped by the operator.
    Stopped,
}

impl AutoplayNotice {
    /// Status line shown to the operator.
    pub fn message(self) -> &'static str {
        match self {
            Self::EndOfSequence => "Fim da apresentação",
            Self::Stopped => "Apresentação automática parada",
        }
    }
}

pub struct AutoplayDriver {
    store: Arc<ProjectionStore>,
    interval: Duration,
}

impl AutoplayDriver {
    pub fn new(store: Arc<ProjectionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn spawn(self) -> AutoplayHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(self.run(stop_rx));
        AutoplayHandle {
            stop_tx: Some(stop_tx),
            join,
        }
    }

    /// Tick every `interval`, starting one interval from now. Each tick reads
    /// the store's current `advance` handler, so handlers swapped in by the
    /// previous step or by the operator are honoured on the next tick.
    pub async fn run(self, mut stop: oneshot::Receiver<()>) -> AutoplayNotice {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "autoplay started");

        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("autoplay stopped");
                    return AutoplayNotice::Stopped;
                }
                _ = ticker.tick() => {
                    if !self.store.advance() {
                        info!("autoplay reached end of sequence");
                        return AutoplayNotice::EndOfSequence;
                    }
                    debug!("autoplay advanced");
                }
            }
        }
    }
}

pub struct AutoplayHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<AutoplayNotice>,
}

impl AutoplayHandle {
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to end. Must not be awaited again once it returned.
    pub async fn finished(&mut self) -> AutoplayNotice {
        (&mut self.join).await.unwrap_or(AutoplayNotice::Stopped)
    }

    pub async fn wait(mut self) -> AutoplayNotice {
        self.finished().await
    }
}
