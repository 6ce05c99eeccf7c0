//! Volume list parsing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use quayside_common::error::Result;
use quayside_common::types::Volume;
use serde_json::Value;

use super::{Strategy, decode_array, parse_layered, str_field, text_lines};

const KIND: &str = "volumes";

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the reference
/// date the runtime encodes numeric timestamps against.
const REFERENCE_DATE_OFFSET_SECS: f64 = 978_307_200.0;

const STRATEGIES: [Strategy<Volume>; 2] = [
    Strategy {
        name: "json",
        parse: parse_json,
    },
    Strategy {
        name: "table",
        parse: parse_table,
    },
];

/// Parses `volume list --format json` output into volumes.
///
/// # Errors
///
/// Never fails in practice: the table fallback accepts any input.
pub fn parse_volumes(raw: &[u8]) -> Result<Vec<Volume>> {
    parse_layered(KIND, raw, &STRATEGIES)
}

fn parse_json(raw: &[u8]) -> Result<Vec<Volume>> {
    let entries = decode_array(KIND, raw)?;
    Ok(entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| Volume {
            name: str_field(entry, "name").unwrap_or_default(),
            mountpoint: str_field(entry, "mountpoint"),
            source: str_field(entry, "source"),
            driver: str_field(entry, "driver"),
            labels: entry.get("labels").and_then(string_map),
            options: entry.get("options").and_then(string_map),
            created_at: entry.get("createdAt").and_then(timestamp),
            format: str_field(entry, "format"),
        })
        .collect())
}

/// Reads a JSON object as a string map, stringifying scalar values.
fn string_map(value: &Value) -> Option<BTreeMap<String, String>> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect(),
    )
}

/// Accepts RFC 3339 strings and reference-date seconds.
#[allow(clippy::cast_possible_truncation)]
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let unix = n.as_f64()? + REFERENCE_DATE_OFFSET_SECS;
            let secs = unix.floor();
            let nanos = ((unix - secs) * 1e9).round() as u32;
            DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
        }
        _ => None,
    }
}

fn parse_table(raw: &[u8]) -> Result<Vec<Volume>> {
    let lines = text_lines(raw);
    let skip_header = lines
        .first()
        .is_some_and(|first| first.split_whitespace().next() == Some("NAME"));

    Ok(lines
        .iter()
        .skip(usize::from(skip_header))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let mut volume = Volume::named(tokens.next()?);
            volume.mountpoint = tokens.next().map(ToString::to_string);
            Some(volume)
        })
        .collect())
}
