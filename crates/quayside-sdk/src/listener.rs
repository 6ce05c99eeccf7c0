//! Snapshot change notifications.
//!
//! Provides an async listener for observing published snapshots, the
//! read-side counterpart of the coordinator's publish step.

use std::sync::Arc;

use tokio::sync::watch;

use crate::snapshot::Snapshot;

/// Observes snapshots published by a [`PollingCoordinator`](crate::coordinator::PollingCoordinator).
#[derive(Debug, Clone)]
pub struct SnapshotListener {
    rx: watch::Receiver<Arc<Snapshot>>,
}

impl SnapshotListener {
    pub(crate) const fn new(rx: watch::Receiver<Arc<Snapshot>>) -> Self {
        Self { rx }
    }

    /// Returns the latest snapshot and marks it as seen.
    pub fn current(&mut self) -> Arc<Snapshot> {
        Arc::clone(&self.rx.borrow_and_update())
    }

    /// Whether a snapshot was published since the last [`current`](Self::current)
    /// or [`next`](Self::next).
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next publication and returns it.
    ///
    /// Returns `None` once the coordinator has been dropped.
    pub async fn next(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}
