//! The unit of consistency published to observers.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quayside_catalog::SystemStatus;
use quayside_common::constants::{STATUS_ERROR, STATUS_UNKNOWN};
use quayside_common::error::{QuaysideError, Result};
use quayside_common::types::{Container, Image, Volume};

/// One complete, internally consistent reading of the catalog.
///
/// Snapshots are only ever replaced whole; observers never see lists from
/// two different refresh cycles side by side.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Apiserver status line, `"unknown"`, or `"Error"` after a failed cycle.
    pub status: String,
    /// Whether the runtime's apiserver is running.
    pub system_running: bool,
    /// Containers, unique by id.
    pub containers: Vec<Container>,
    /// Images, unique by reference.
    pub images: Vec<Image>,
    /// Volumes, unique by name.
    pub volumes: Vec<Volume>,
    /// Error of the cycle that produced this snapshot, if it failed.
    pub last_error: Option<Arc<QuaysideError>>,
    /// Publication counter; `0` for the initial empty snapshot.
    pub generation: u64,
    /// When the producing cycle finished.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            status: STATUS_UNKNOWN.to_string(),
            system_running: false,
            containers: Vec::new(),
            images: Vec::new(),
            volumes: Vec::new(),
            last_error: None,
            generation: 0,
            refreshed_at: None,
        }
    }
}

impl Snapshot {
    /// Assembles a snapshot from one successful cycle.
    ///
    /// Duplicate identifiers keep their first occurrence.
    #[must_use]
    pub fn from_parts(
        status: SystemStatus,
        containers: Vec<Container>,
        images: Vec<Image>,
        volumes: Vec<Volume>,
    ) -> Self {
        Self {
            status: status.text,
            system_running: status.running,
            containers: dedup_by_key("container", containers, |c| c.id.clone()),
            images: dedup_by_key("image", images, |i| i.reference.clone()),
            volumes: dedup_by_key("volume", volumes, |v| v.name.clone()),
            last_error: None,
            generation: 0,
            refreshed_at: Some(Utc::now()),
        }
    }

    /// The collapsed snapshot published when any read of a cycle fails.
    #[must_use]
    pub fn failed(error: QuaysideError) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            last_error: Some(Arc::new(error)),
            refreshed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Whether the producing cycle failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Looks up a container by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if this snapshot has no such container.
    pub fn container(&self, id: &str) -> Result<&Container> {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| QuaysideError::NotFound {
                kind: "container",
                id: id.to_string(),
            })
    }

    /// Looks up a volume by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if this snapshot has no such volume.
    pub fn volume(&self, name: &str) -> Result<&Volume> {
        self.volumes
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| QuaysideError::NotFound {
                kind: "volume",
                id: name.to_string(),
            })
    }
}

fn dedup_by_key<T>(kind: &'static str, items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| {
            let id = key(item);
            let fresh = seen.insert(id.clone());
            if !fresh {
                tracing::warn!(kind, id = %id, "dropping duplicate entry from runtime output");
            }
            fresh
        })
        .collect()
}
