//! Parsers turning raw runtime CLI output into domain records.
//!
//! Every list parser is an ordered set of [`Strategy`] values: a structured
//! JSON decoder first, a tolerant text-table reader second. The first
//! strategy that succeeds wins and later ones never run. Decode failures of
//! an earlier strategy are logged and swallowed.

pub mod containers;
pub mod images;
pub mod system;
pub mod volumes;

use quayside_common::error::{QuaysideError, Result};
use serde_json::Value;

pub use containers::parse_containers;
pub use images::parse_images;
pub use system::{is_system_running, parse_system_status};
pub use volumes::parse_volumes;

/// One way of reading a command's output.
#[derive(Debug, Clone, Copy)]
pub struct Strategy<T> {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Parsing function.
    pub parse: fn(&[u8]) -> Result<Vec<T>>,
}

/// Runs `strategies` in order and returns the first success.
///
/// When every strategy fails, the last error is returned.
///
/// # Errors
///
/// Returns the error of the final strategy if none succeeds.
pub fn parse_layered<T>(kind: &'static str, raw: &[u8], strategies: &[Strategy<T>]) -> Result<Vec<T>> {
    let mut last_error = None;
    for strategy in strategies {
        match (strategy.parse)(raw) {
            Ok(records) => {
                tracing::trace!(kind, strategy = strategy.name, count = records.len(), "parsed output");
                return Ok(records);
            }
            Err(e) => {
                tracing::debug!(kind, strategy = strategy.name, error = %e, "parse strategy failed");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| QuaysideError::Config {
        message: format!("no parse strategy configured for {kind}"),
    }))
}

/// Decodes `raw` as a JSON array, keeping each element as a raw value.
///
/// Decoding per element lets one malformed record be skipped without losing
/// its siblings.
pub(crate) fn decode_array(kind: &'static str, raw: &[u8]) -> Result<Vec<Value>> {
    serde_json::from_slice::<Vec<Value>>(raw).map_err(|source| QuaysideError::DecodeFailed { kind, source })
}

/// Non-blank lines of `raw`, lossily decoded.
pub(crate) fn text_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Returns the string at `key` unless it is missing, not a string, or empty.
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
