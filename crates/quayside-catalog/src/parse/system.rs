//! `system status` parsing.

use quayside_common::constants::STATUS_UNKNOWN;

const APISERVER_MARKER: &str = "apiserver is";

/// Returns the trimmed line mentioning the apiserver, or `"unknown"`.
#[must_use]
pub fn parse_system_status(raw: &[u8]) -> String {
    find_status_line(&String::from_utf8_lossy(raw)).unwrap_or_else(|| STATUS_UNKNOWN.to_string())
}

/// Returns the trimmed line mentioning the apiserver, if any.
pub(crate) fn find_status_line(text: &str) -> Option<String> {
    text.lines()
        .find(|line| line.to_lowercase().contains(APISERVER_MARKER))
        .map(|line| line.trim().to_string())
}

/// Classifies status text; anything unrecognised counts as not running.
#[must_use]
pub fn is_system_running(status: &str) -> bool {
    let lower = status.to_lowercase();
    if lower.contains("apiserver is not running") {
        return false;
    }
    lower.contains("apiserver is running")
}
