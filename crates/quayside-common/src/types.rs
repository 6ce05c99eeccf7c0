//! Domain records describing the runtime's catalog.
//!
//! All records are plain values: they are parsed fresh on every refresh and
//! replaced wholesale, never patched in place.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::STATE_RUNNING;

/// A container as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Runtime-assigned name, unique within a snapshot.
    pub id: String,
    /// Image reference the container was created from.
    pub image: String,
    /// Guest operating system, when the runtime reports a platform.
    pub os: Option<String>,
    /// Guest CPU architecture, when the runtime reports a platform.
    pub arch: Option<String>,
    /// Free-form lifecycle state (e.g. "running", "stopped").
    pub state: String,
    /// Whether `state` is exactly `"running"`.
    pub running: bool,
    /// Network address of the first attached network.
    pub address: Option<String>,
    /// Filesystem mounts in the order the runtime lists them.
    pub mounts: Vec<Mount>,
}

impl Container {
    /// Creates a container record, deriving the running flag from `state`.
    #[must_use]
    pub fn new(id: impl Into<String>, image: impl Into<String>, state: impl Into<String>) -> Self {
        let state = state.into();
        Self {
            id: id.into(),
            image: image.into(),
            os: None,
            arch: None,
            running: state == STATE_RUNNING,
            state,
            address: None,
            mounts: Vec::new(),
        }
    }

    /// Returns `os/arch` when both are known.
    #[must_use]
    pub fn platform(&self) -> Option<String> {
        match (&self.os, &self.arch) {
            (Some(os), Some(arch)) => Some(format!("{os}/{arch}")),
            _ => None,
        }
    }
}

/// A filesystem mount attached to a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Host path backing the mount.
    pub source: Option<String>,
    /// Path inside the container.
    pub destination: Option<String>,
    /// Name of the backing volume, for volume mounts.
    pub volume_name: Option<String>,
    /// On-disk format of the backing volume.
    pub volume_format: Option<String>,
}

impl Mount {
    /// A mount is meaningful when it names a volume or a host source.
    #[must_use]
    pub const fn is_meaningful(&self) -> bool {
        self.volume_name.is_some() || self.source.is_some()
    }
}

impl fmt::Display for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self
            .volume_name
            .as_deref()
            .or(self.source.as_deref())
            .unwrap_or("?");
        match &self.destination {
            Some(dest) => write!(f, "{from}:{dest}"),
            None => write!(f, "{from}"),
        }
    }
}

/// A locally available image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image reference, unique within a snapshot.
    pub reference: String,
    /// Human-readable size.
    pub size: Option<String>,
}

/// A named volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume name, unique within a snapshot.
    pub name: String,
    /// Where the runtime mounts the volume.
    pub mountpoint: Option<String>,
    /// Host path backing the volume.
    pub source: Option<String>,
    /// Volume driver.
    pub driver: Option<String>,
    /// User-supplied labels.
    pub labels: Option<BTreeMap<String, String>>,
    /// Driver options.
    pub options: Option<BTreeMap<String, String>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// On-disk format (e.g. "ext4").
    pub format: Option<String>,
}

impl Volume {
    /// Creates a volume record with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_flag_requires_exact_lowercase_state() {
        assert!(Container::new("db", "pg:17", "running").running);
        assert!(!Container::new("db", "pg:17", "Running").running);
        assert!(!Container::new("db", "pg:17", "stopped").running);
    }

    #[test]
    fn platform_needs_both_parts() {
        let mut c = Container::new("db", "pg:17", "running");
        assert_eq!(c.platform(), None);
        c.os = Some("linux".into());
        c.arch = Some("arm64".into());
        assert_eq!(c.platform().as_deref(), Some("linux/arm64"));
    }

    #[test]
    fn mount_display_prefers_volume_name() {
        let mount = Mount {
            source: Some("/var/lib/vols/data".into()),
            destination: Some("/data".into()),
            volume_name: Some("data".into()),
            volume_format: None,
        };
        assert_eq!(mount.to_string(), "data:/data");
        assert!(mount.is_meaningful());
        assert!(!Mount::default().is_meaningful());
    }
}
