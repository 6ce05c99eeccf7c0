//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used in log output and the data directory.
pub const APP_NAME: &str = "quayside";

/// Binary name for the CLI front end.
pub const BIN_NAME: &str = "quay";

/// Executable name of the runtime CLI looked up on `PATH`.
pub const RUNTIME_CLI_NAME: &str = "container";

/// Install location of the runtime CLI when it is not on `PATH`.
pub const DEFAULT_RUNTIME_CLI_PATH: &str = "/usr/local/bin/container";

/// Seconds between two polling refresh cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// File name of the optional YAML configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Status text reported when the runtime never mentions its apiserver.
pub const STATUS_UNKNOWN: &str = "unknown";

/// Status text of the snapshot published after a failed refresh.
pub const STATUS_ERROR: &str = "Error";

/// Container state used when the runtime omits one.
pub const STATE_UNKNOWN: &str = "unknown";

/// The only container state that counts as running.
pub const STATE_RUNNING: &str = "running";

/// Returns `$HOME/.quayside`, falling back to a relative `.quayside`
/// directory when no home directory is known.
fn resolve_data_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_or_else(
            |_| PathBuf::from(format!(".{APP_NAME}")),
            |home| PathBuf::from(home).join(format!(".{APP_NAME}")),
        )
}

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved data directory for this session.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(resolve_data_dir)
}

/// Returns the default configuration file path.
pub fn default_config_file() -> PathBuf {
    data_dir().join(CONFIG_FILE_NAME)
}
