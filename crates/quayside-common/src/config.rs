//! Global configuration model for Quayside.
//!
//! Values come from three layers, lowest precedence first: built-in
//! defaults, the optional YAML file, and command-line overrides applied by
//! the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{QuaysideError, Result};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuaysideConfig {
    /// Explicit path to the runtime CLI. Looked up on `PATH` when unset.
    pub cli_path: Option<PathBuf>,
    /// Seconds between polling refresh cycles.
    pub poll_interval_secs: u64,
    /// Per-invocation deadline for the runtime CLI, in seconds.
    pub command_timeout_secs: Option<u64>,
}

impl Default for QuaysideConfig {
    fn default() -> Self {
        Self {
            cli_path: None,
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL_SECS,
            command_timeout_secs: None,
        }
    }
}

impl QuaysideConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default file in the
    /// data directory is read when present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = constants::default_config_file();
                if default.exists() {
                    Self::from_file(&default)
                } else {
                    tracing::debug!(path = %default.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path).map_err(|e| QuaysideError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parses configuration from YAML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or a value is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(QuaysideError::Config {
                message: "poll_interval_secs must be at least 1".into(),
            });
        }
        if self.command_timeout_secs == Some(0) {
            return Err(QuaysideError::Config {
                message: "command_timeout_secs must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Interval between two polling refresh cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Deadline applied to each runtime CLI invocation, if any.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Resolves the runtime CLI executable.
    ///
    /// Uses the configured path, then `container` on `PATH`, then the
    /// default install location.
    #[must_use]
    pub fn resolve_cli_path(&self) -> PathBuf {
        if let Some(path) = &self.cli_path {
            return path.clone();
        }
        which::which(constants::RUNTIME_CLI_NAME)
            .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_RUNTIME_CLI_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_every_five_seconds_without_timeout() {
        let config = QuaysideConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.command_timeout().is_none());
        assert!(config.cli_path.is_none());
    }

    #[test]
    fn yaml_overrides_only_given_keys() {
        let config = QuaysideConfig::from_yaml("command_timeout_secs: 30\n").unwrap();
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.poll_interval_secs, constants::DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            QuaysideConfig::from_yaml("  \n").unwrap(),
            QuaysideConfig::default()
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = QuaysideConfig::from_yaml("poll_interval_secs: 0").unwrap_err();
        assert!(matches!(err, QuaysideError::Config { .. }));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = QuaysideConfig::from_yaml("poll_interval_secs: [oops").unwrap_err();
        assert!(matches!(err, QuaysideError::Yaml { .. }));
    }

    #[test]
    fn explicit_cli_path_wins() {
        let config = QuaysideConfig {
            cli_path: Some(PathBuf::from("/opt/bin/container")),
            ..QuaysideConfig::default()
        };
        assert_eq!(config.resolve_cli_path(), PathBuf::from("/opt/bin/container"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cli_path: /tmp/container\npoll_interval_secs: 2\n").unwrap();

        let config = QuaysideConfig::load(Some(&path)).unwrap();
        assert_eq!(config.cli_path, Some(PathBuf::from("/tmp/container")));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn load_missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = QuaysideConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, QuaysideError::Io { .. }));
    }
}
