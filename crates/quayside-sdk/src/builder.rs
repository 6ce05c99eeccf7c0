//! Fluent builders for write requests.

use quayside_catalog::{NewContainer, NewVolume};
use quayside_common::error::{QuaysideError, Result};

/// Builder for a container creation request.
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    request: NewContainer,
}

impl ContainerBuilder {
    /// Creates a new builder with the given container name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            request: NewContainer {
                name: name.into(),
                ..NewContainer::default()
            },
        }
    }

    /// Sets the image reference.
    #[must_use]
    pub fn image(mut self, reference: impl Into<String>) -> Self {
        self.request.image = reference.into();
        self
    }

    /// Mounts `volume` at `target`. A later call for the same volume wins.
    #[must_use]
    pub fn volume(mut self, volume: impl Into<String>, target: impl Into<String>) -> Self {
        let _ = self.request.volumes.insert(volume.into(), target.into());
        self
    }

    /// Parses a `volume:target` pair, as accepted on the command line.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `spec` has no `:` separator.
    pub fn volume_spec(self, spec: &str) -> Result<Self> {
        let (volume, target) = spec.split_once(':').ok_or_else(|| QuaysideError::Config {
            message: format!("volume mapping '{spec}' must look like NAME:TARGET"),
        })?;
        Ok(self.volume(volume, target))
    }

    /// Validates and returns the request.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the name or image is missing.
    pub fn build(self) -> Result<NewContainer> {
        let _ = self.request.to_args()?;
        Ok(self.request)
    }
}

/// Builder for a volume creation request.
#[derive(Debug, Default)]
pub struct VolumeBuilder {
    request: NewVolume,
}

impl VolumeBuilder {
    /// Creates a new builder with the given volume name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            request: NewVolume {
                name: name.into(),
                ..NewVolume::default()
            },
        }
    }

    /// Sets the requested size, e.g. `"10G"`.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.request.size = Some(size.into());
        self
    }

    /// Adds a driver option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.request.options.insert(key.into(), value.into());
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.request.labels.insert(key.into(), value.into());
        self
    }

    /// Validates and returns the request.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the name is blank.
    pub fn build(self) -> Result<NewVolume> {
        let _ = self.request.to_args()?;
        Ok(self.request)
    }
}

/// Splits a `KEY=VALUE` pair.
///
/// # Errors
///
/// Returns a `Config` error if `pair` has no `=` separator.
pub fn parse_key_value(pair: &str) -> Result<(String, String)> {
    pair.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| QuaysideError::Config {
            message: format!("'{pair}' must look like KEY=VALUE"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_builder_collects_volumes() {
        let request = ContainerBuilder::new("db")
            .image("pg:17")
            .volume("pgdata", "/var/lib/postgresql")
            .volume_spec("backups:/backups")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.volumes.len(), 2);
        assert_eq!(
            request.to_args().unwrap().join(" "),
            "create --name db --volume backups:/backups --volume pgdata:/var/lib/postgresql pg:17"
        );
    }

    #[test]
    fn container_builder_requires_image() {
        assert!(ContainerBuilder::new("db").build().is_err());
    }

    #[test]
    fn malformed_volume_spec_is_rejected() {
        assert!(ContainerBuilder::new("db").volume_spec("no-separator").is_err());
    }

    #[test]
    fn volume_builder_sets_all_fields() {
        let request = VolumeBuilder::new("pgdata")
            .size("10G")
            .option("compression", "lz4")
            .label("app", "db")
            .build()
            .unwrap();
        assert_eq!(request.size.as_deref(), Some("10G"));
        assert_eq!(
            request.to_args().unwrap().join(" "),
            "volume create pgdata -s 10G --opt compression=lz4 --label app=db"
        );
    }

    #[test]
    fn key_value_pairs_split_on_first_equals() {
        assert_eq!(
            parse_key_value("opt=a=b").unwrap(),
            ("opt".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
    }
}
