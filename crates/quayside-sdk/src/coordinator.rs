//! Periodic, non-overlapping catalog refresh.
//!
//! The coordinator owns at most one background polling task and the latest
//! [`Snapshot`]. A refresh cycle issues the four catalog reads concurrently
//! and publishes either a complete new snapshot or, if any read fails, the
//! collapsed error snapshot. Cycles never overlap: a manual refresh issued
//! while the loop is mid-cycle waits for that cycle to finish.
//!
//! Stopping signals the loop, waits for it to exit, and then advances a
//! publish epoch. Detached refreshes started before the stop compare their
//! epoch at publish time and are discarded, so nothing is published after
//! [`PollingCoordinator::stop_polling`] returns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use quayside_catalog::{CatalogClient, NewContainer, NewVolume};
use quayside_common::error::{QuaysideError, Result};
use quayside_common::types::Container;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::listener::SnapshotListener;
use crate::snapshot::Snapshot;

/// Shared handle to the polling loop and the published snapshot.
///
/// Create one per process and pass clones to whoever needs to observe or
/// drive the catalog. Background work ends when [`stop_polling`] is called
/// or the last clone is dropped.
///
/// [`stop_polling`]: Self::stop_polling
#[derive(Debug, Clone)]
pub struct PollingCoordinator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: CatalogClient,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    publish: Mutex<PublishState>,
    cycle_gate: tokio::sync::Mutex<()>,
    poller: tokio::sync::Mutex<Option<Poller>>,
}

#[derive(Debug, Default)]
struct PublishState {
    epoch: u64,
    generation: u64,
}

#[derive(Debug)]
struct Poller {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
    interval: Duration,
}

impl Poller {
    async fn shutdown(self) {
        let _ = self.cancel.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "polling task ended abnormally");
        }
    }
}

impl PollingCoordinator {
    /// Creates a stopped coordinator publishing an empty snapshot.
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            inner: Arc::new(Inner {
                client,
                snapshot_tx,
                publish: Mutex::new(PublishState::default()),
                cycle_gate: tokio::sync::Mutex::new(()),
                poller: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// The catalog client used for every cycle and write.
    #[must_use]
    pub fn client(&self) -> &CatalogClient {
        &self.inner.client
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.snapshot_tx.borrow())
    }

    /// Error of the latest cycle, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<Arc<QuaysideError>> {
        self.inner.snapshot_tx.borrow().last_error.clone()
    }

    /// Returns a listener notified on every publication.
    #[must_use]
    pub fn subscribe(&self) -> SnapshotListener {
        SnapshotListener::new(self.inner.snapshot_tx.subscribe())
    }

    /// Looks up a container in the latest snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the latest snapshot has no such container.
    pub fn container(&self, id: &str) -> Result<Container> {
        self.snapshot().container(id).cloned()
    }

    /// Whether a polling loop is active.
    pub async fn is_polling(&self) -> bool {
        self.inner.poller.lock().await.is_some()
    }

    /// Interval of the active polling loop.
    pub async fn polling_interval(&self) -> Option<Duration> {
        self.inner.poller.lock().await.as_ref().map(|p| p.interval)
    }

    /// Starts polling every `interval`, refreshing immediately.
    ///
    /// An active loop is cancelled and awaited first, so at most one loop
    /// ever runs. Refreshes queued with [`refresh`](Self::refresh) still
    /// publish; only [`stop_polling`](Self::stop_polling) discards them.
    pub async fn start_polling(&self, interval: Duration) {
        let mut poller = self.inner.poller.lock().await;
        if let Some(previous) = poller.take() {
            previous.shutdown().await;
            tracing::debug!("replaced previous polling loop");
        }

        let (cancel, cancel_rx) = watch::channel(false);
        let epoch = self.inner.epoch();
        let task = tokio::spawn(poll_loop(
            Arc::downgrade(&self.inner),
            interval,
            cancel_rx,
            epoch,
        ));
        *poller = Some(Poller {
            cancel,
            task,
            interval,
        });
        tracing::info!(interval_ms = interval.as_millis(), "polling started");
    }

    /// Stops polling. Safe to call when no loop is active.
    ///
    /// A cycle already in flight is allowed to finish and publish before
    /// this returns; nothing is published afterwards.
    pub async fn stop_polling(&self) {
        let mut poller = self.inner.poller.lock().await;
        if let Some(active) = poller.take() {
            active.shutdown().await;
            tracing::info!("polling stopped");
        }
        self.inner.advance_epoch();
    }

    /// Triggers one refresh cycle in the background and returns at once.
    ///
    /// The cycle is discarded if [`stop_polling`](Self::stop_polling) is
    /// called before it publishes.
    pub fn refresh(&self) {
        let inner = Arc::clone(&self.inner);
        let epoch = inner.epoch();
        drop(tokio::spawn(async move {
            let _ = inner.refresh_cycle(epoch).await;
        }));
    }

    /// Runs one refresh cycle and returns the snapshot published afterwards.
    pub async fn refresh_now(&self) -> Arc<Snapshot> {
        let epoch = self.inner.epoch();
        let _ = self.inner.refresh_cycle(epoch).await;
        self.snapshot()
    }

    /// Starts a container. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn start_container(&self, id: &str) -> Result<()> {
        self.inner.client.start_container(id).await
    }

    /// Stops a container. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn stop_container(&self, id: &str) -> Result<()> {
        self.inner.client.stop_container(id).await
    }

    /// Deletes a container. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn delete_container(&self, id: &str) -> Result<()> {
        self.inner.client.delete_container(id).await
    }

    /// Creates a container. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the runtime CLI fails.
    pub async fn create_container(&self, request: &NewContainer) -> Result<()> {
        self.inner.client.create_container(request).await
    }

    /// Starts the runtime's system services. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn start_system(&self) -> Result<()> {
        self.inner.client.start_system().await
    }

    /// Stops the runtime's system services. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn stop_system(&self) -> Result<()> {
        self.inner.client.stop_system().await
    }

    /// Creates a volume. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the runtime CLI fails.
    pub async fn create_volume(&self, request: &NewVolume) -> Result<()> {
        self.inner.client.create_volume(request).await
    }

    /// Deletes a volume. Follow with [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime CLI fails.
    pub async fn delete_volume(&self, name: &str) -> Result<()> {
        self.inner.client.delete_volume(name).await
    }
}

impl Inner {
    fn publish_state(&self) -> MutexGuard<'_, PublishState> {
        self.publish.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn epoch(&self) -> u64 {
        self.publish_state().epoch
    }

    fn advance_epoch(&self) {
        self.publish_state().epoch += 1;
    }

    /// Runs one cycle; returns whether its snapshot was published.
    async fn refresh_cycle(&self, epoch: u64) -> bool {
        let _gate = self.cycle_gate.lock().await;
        if self.epoch() != epoch {
            tracing::debug!("skipping refresh cancelled while queued");
            return false;
        }

        let client = &self.client;
        let reads = tokio::try_join!(
            client.system_status(),
            client.list_containers(),
            client.list_images(),
            client.list_volumes()
        );

        let snapshot = match reads {
            Ok((status, containers, images, volumes)) => {
                tracing::debug!(
                    containers = containers.len(),
                    images = images.len(),
                    volumes = volumes.len(),
                    running = status.running,
                    "refresh cycle complete"
                );
                Snapshot::from_parts(status, containers, images, volumes)
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh cycle failed, publishing empty snapshot");
                Snapshot::failed(e)
            }
        };
        self.publish(epoch, snapshot)
    }

    fn publish(&self, epoch: u64, mut snapshot: Snapshot) -> bool {
        let mut state = self.publish_state();
        if state.epoch != epoch {
            tracing::debug!("discarding snapshot from a stopped refresh");
            return false;
        }
        state.generation += 1;
        snapshot.generation = state.generation;
        let _ = self.snapshot_tx.send_replace(Arc::new(snapshot));
        true
    }
}

/// Refreshes immediately, then once per `interval` until cancelled.
///
/// Holds only a weak reference between cycles so that dropping every
/// coordinator handle ends the loop.
async fn poll_loop(
    inner: Weak<Inner>,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
    epoch: u64,
) {
    loop {
        if *cancel.borrow() {
            break;
        }
        let Some(strong) = inner.upgrade() else {
            break;
        };
        let _ = strong.refresh_cycle(epoch).await;
        drop(strong);

        if *cancel.borrow() {
            break;
        }
        tokio::select! {
            biased;
            _ = cancel.changed() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
    tracing::debug!("polling loop exited");
}
