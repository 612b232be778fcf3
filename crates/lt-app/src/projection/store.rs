use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use lt_core::ports::ProjectionChannelPort;
use lt_core::projection::InvalidDisplaySettings;
use lt_core::{DisplaySettings, ProjectionSnapshot, ProjectionState, WriterEpoch};

use super::{NavigationHandlers, SnapshotPublisher};

struct StoreState {
    projection: ProjectionState,
    settings: DisplaySettings,
    blackout: bool,
    epoch: WriterEpoch,
    /// Seq of the last queued snapshot.
    seq: u64,
    handlers: NavigationHandlers,
}

/// Projection State Store plus Navigation Handler Registry for one control surface.
///
/// Writes apply synchronously and are visible to the next read. Writes to
/// projection, settings or blackout each queue exactly one snapshot for the
/// publisher; handler writes never do.
pub struct ProjectionStore {
    state: Mutex<StoreState>,
    outbox: mpsc::UnboundedSender<ProjectionSnapshot>,
}

impl ProjectionStore {
    /// Create the store and the publisher that must be spawned alongside it.
    ///
    /// Each store publishes under a fresh [`WriterEpoch`]. `resume_seq` is the
    /// seq of the durable snapshot left by a previous run, so seqs keep
    /// growing across restarts when that snapshot survives. The initial IDLE
    /// state is queued immediately.
    pub fn new(
        channel: Arc<dyn ProjectionChannelPort>,
        settings: DisplaySettings,
        resume_seq: u64,
    ) -> (Arc<Self>, SnapshotPublisher) {
        let (outbox, rx) = mpsc::unbounded_channel();
        let store = Arc::new(Self {
            state: Mutex::new(StoreState {
                projection: ProjectionState::idle(),
                settings,
                blackout: false,
                epoch: WriterEpoch::new(),
                seq: resume_seq,
                handlers: NavigationHandlers::none(),
            }),
            outbox,
        });
        store.publish(&mut store.lock());
        (store, SnapshotPublisher::new(rx, channel))
    }

    pub fn set_projection(&self, next: ProjectionState) {
        let mut state = self.lock();
        state.projection = next;
        self.publish(&mut state);
    }

    /// Back to IDLE. Also drops the navigation handlers of the sequence that
    /// was being shown.
    pub fn clear_projection(&self) {
        let mut state = self.lock();
        state.projection = ProjectionState::idle();
        state.handlers = NavigationHandlers::none();
        self.publish(&mut state);
    }

    /// Flip the blackout flag and return its new value.
    pub fn toggle_blackout(&self) -> bool {
        let mut state = self.lock();
        state.blackout = !state.blackout;
        let blackout = state.blackout;
        self.publish(&mut state);
        blackout
    }

    pub fn set_display_settings(
        &self,
        settings: DisplaySettings,
    ) -> Result<(), InvalidDisplaySettings> {
        settings.validate()?;
        let mut state = self.lock();
        state.settings = settings;
        self.publish(&mut state);
        Ok(())
    }

    /// Replace both handlers wholesale. Local only, nothing is published.
    pub fn set_navigation_handlers(&self, handlers: NavigationHandlers) {
        self.lock().handlers = handlers;
    }

    pub fn projection(&self) -> ProjectionState {
        self.lock().projection.clone()
    }

    pub fn settings(&self) -> DisplaySettings {
        self.lock().settings.clone()
    }

    pub fn blackout(&self) -> bool {
        self.lock().blackout
    }

    /// Current pair. Callers read this on every use rather than caching it.
    pub fn navigation_handlers(&self) -> NavigationHandlers {
        self.lock().handlers.clone()
    }

    /// The tuple most recently queued for replication.
    pub fn snapshot(&self) -> ProjectionSnapshot {
        let state = self.lock();
        Self::snapshot_of(&state)
    }

    /// Run the current `advance` handler. Returns `false` when the sequence is
    /// exhausted or nothing is active.
    pub fn advance(&self) -> bool {
        let handler = self.lock().handlers.advance.clone();
        match handler {
            Some(advance) => {
                advance();
                true
            }
            None => false,
        }
    }

    /// Run the current `retreat` handler, if any.
    pub fn retreat(&self) -> bool {
        let handler = self.lock().handlers.retreat.clone();
        match handler {
            Some(retreat) => {
                retreat();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(state: &StoreState) -> ProjectionSnapshot {
        ProjectionSnapshot {
            epoch: state.epoch.clone(),
            seq: state.seq,
            projection: state.projection.clone(),
            settings: state.settings.clone(),
            blackout: state.blackout,
        }
    }

    // Queued while the lock is held so seq order and queue order agree.
    fn publish(&self, state: &mut StoreState) {
        state.seq += 1;
        let snapshot = Self::snapshot_of(state);
        debug!(seq = snapshot.seq, kind = ?snapshot.projection.kind(), "projection changed");
        if self.outbox.send(snapshot).is_err() {
            warn!(seq = state.seq, "snapshot publisher is gone, change stays local");
        }
    }
}
