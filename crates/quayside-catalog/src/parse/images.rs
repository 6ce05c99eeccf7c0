//! Image list parsing.

use quayside_common::error::Result;
use quayside_common::format::format_bytes;
use quayside_common::types::Image;
use serde_json::Value;

use super::{Strategy, decode_array, parse_layered, str_field, text_lines};

const KIND: &str = "images";

const STRATEGIES: [Strategy<Image>; 2] = [
    Strategy {
        name: "json",
        parse: parse_json,
    },
    Strategy {
        name: "table",
        parse: parse_table,
    },
];

/// Parses `images list --format json` output into images.
///
/// # Errors
///
/// Never fails in practice: the table fallback accepts any input.
pub fn parse_images(raw: &[u8]) -> Result<Vec<Image>> {
    parse_layered(KIND, raw, &STRATEGIES)
}

fn parse_json(raw: &[u8]) -> Result<Vec<Image>> {
    let entries = decode_array(KIND, raw)?;
    Ok(entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| Image {
            reference: str_field(entry, "reference").unwrap_or_default(),
            size: entry
                .get("size")
                .and_then(size_text)
                .or_else(|| entry.get("descriptor")?.get("size").and_then(size_text)),
        })
        .collect())
}

/// Sizes arrive either pre-formatted or as a byte count.
fn size_text(size: &Value) -> Option<String> {
    match size {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_u64().map(format_bytes),
        _ => None,
    }
}

fn parse_table(raw: &[u8]) -> Result<Vec<Image>> {
    let lines = text_lines(raw);
    let skip_header = lines.first().is_some_and(|first| {
        first
            .split_whitespace()
            .next()
            .is_some_and(|token| token == "NAME" || token == "REFERENCE")
    });

    Ok(lines
        .iter()
        .skip(usize::from(skip_header))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let reference = tokens.next()?.to_string();
            Some(Image {
                reference,
                size: tokens.next().map(ToString::to_string),
            })
        })
        .collect())
}
