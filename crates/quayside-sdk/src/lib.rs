//! # quayside-sdk
//!
//! Public SDK for embedding Quayside in a desktop front end.
//!
//! Provides three main entry points:
//! - [`PollingCoordinator`](coordinator::PollingCoordinator): Keeps a [`Snapshot`](snapshot::Snapshot) of the runtime's catalog fresh.
//! - [`SnapshotListener`](listener::SnapshotListener): Observes snapshot publications.
//! - [`ContainerBuilder`](builder::ContainerBuilder) / [`VolumeBuilder`](builder::VolumeBuilder): Fluent write requests.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use quayside_catalog::CatalogClient;
//! use quayside_sdk::coordinator::PollingCoordinator;
//!
//! # async fn demo() {
//! let coordinator = PollingCoordinator::new(CatalogClient::new("/usr/local/bin/container"));
//! coordinator.start_polling(Duration::from_secs(5)).await;
//!
//! let mut listener = coordinator.subscribe();
//! if let Some(snapshot) = listener.next().await {
//!     println!("{} containers", snapshot.containers.len());
//! }
//! coordinator.stop_polling().await;
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod builder;
pub mod coordinator;
pub mod listener;
pub mod snapshot;

pub use coordinator::PollingCoordinator;
pub use listener::SnapshotListener;
pub use snapshot::Snapshot;
