//! Unified error types for the Quayside workspace.
//!
//! Every library crate returns [`Result`]; the binary converts into
//! `anyhow::Error` at its outermost layer.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum QuaysideError {
    /// The runtime CLI ran but exited non-zero, or could not be started.
    #[error("{program} exited with status {exit_code}: {output}")]
    ExecutionFailed {
        /// Program that was invoked.
        program: String,
        /// Exit code reported by the process (`-1` when it never started or
        /// was terminated by a signal).
        exit_code: i32,
        /// Combined standard output and standard error.
        output: String,
    },

    /// The runtime CLI did not finish before the configured deadline.
    #[error("{program} timed out after {after:?}")]
    Timeout {
        /// Program that was invoked.
        program: String,
        /// Deadline that elapsed.
        after: Duration,
    },

    /// Structured output could not be decoded.
    ///
    /// Parsers recover from this by switching to their tabular fallback, so
    /// it never reaches callers of the catalog client.
    #[error("failed to decode {kind} output: {source}")]
    DecodeFailed {
        /// Resource kind whose output was being decoded.
        kind: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A configuration value or request is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("configuration parse error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, QuaysideError>;
