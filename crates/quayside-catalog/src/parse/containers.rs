//! Container list parsing.
//!
//! Structured input is the runtime's `list --format json` array, where each
//! descriptor nests its identity under `configuration`. The fallback reads
//! the legacy `ID IMAGE OS ARCH STATE [ADDR]` table.

use std::sync::LazyLock;

use quayside_common::constants::STATE_UNKNOWN;
use quayside_common::error::Result;
use quayside_common::types::{Container, Mount};
use regex::Regex;
use serde_json::Value;

use super::{Strategy, decode_array, parse_layered, str_field, text_lines};

const KIND: &str = "containers";

/// Strict row shape: five required columns and an optional address.
static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)(?:\s+(\S+))?\s*$")
        .unwrap_or_else(|e| unreachable!("container row pattern is valid: {e}"))
});

const STRATEGIES: [Strategy<Container>; 2] = [
    Strategy {
        name: "json",
        parse: parse_json,
    },
    Strategy {
        name: "table",
        parse: parse_table,
    },
];

/// Parses `list --all --format json` output into containers.
///
/// # Errors
///
/// Never fails in practice: the table fallback accepts any input.
pub fn parse_containers(raw: &[u8]) -> Result<Vec<Container>> {
    parse_layered(KIND, raw, &STRATEGIES)
}

fn parse_json(raw: &[u8]) -> Result<Vec<Container>> {
    let descriptors = decode_array(KIND, raw)?;
    Ok(descriptors
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| {
            let container = container_from_json(descriptor);
            if container.is_none() {
                tracing::warn!(index, "skipping container descriptor that is not an object");
            }
            container
        })
        .collect())
}

fn container_from_json(descriptor: &Value) -> Option<Container> {
    if !descriptor.is_object() {
        return None;
    }
    let config = descriptor.get("configuration").filter(|c| c.is_object());

    let id = config
        .and_then(|c| str_field(c, "id"))
        .or_else(|| str_field(descriptor, "id"))
        .unwrap_or_default();
    let image = config
        .and_then(|c| image_reference(c.get("image")?))
        .or_else(|| image_reference(descriptor.get("image")?))
        .unwrap_or_default();
    let state = str_field(descriptor, "status")
        .or_else(|| str_field(descriptor, "state"))
        .unwrap_or_else(|| STATE_UNKNOWN.to_string());

    let mut container = Container::new(id, image, state);

    if let Some(platform) = config.and_then(|c| c.get("platform")) {
        container.os = str_field(platform, "os");
        container.arch = str_field(platform, "architecture").or_else(|| str_field(platform, "arch"));
    }

    container.address = first_address(descriptor.get("networks"))
        .or_else(|| first_address(config.and_then(|c| c.get("networks"))));

    if let Some(mounts) = config.and_then(|c| c.get("mounts")).and_then(Value::as_array) {
        container.mounts = mounts.iter().filter_map(mount_from_json).collect();
    }

    Some(container)
}

/// Accepts either a bare reference string or an `{ "reference": ... }` object.
fn image_reference(image: &Value) -> Option<String> {
    match image {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => str_field(image, "reference"),
        _ => None,
    }
}

fn first_address(networks: Option<&Value>) -> Option<String> {
    networks?
        .as_array()?
        .iter()
        .find_map(|n| str_field(n, "address").or_else(|| str_field(n, "ipv4Address")))
}

fn mount_from_json(value: &Value) -> Option<Mount> {
    let volume = value.get("type").and_then(|t| t.get("volume"));
    let mount = Mount {
        source: str_field(value, "source"),
        destination: str_field(value, "destination").or_else(|| str_field(value, "target")),
        volume_name: volume.and_then(|v| str_field(v, "name")),
        volume_format: volume.and_then(|v| str_field(v, "format")),
    };
    if mount.is_meaningful() {
        Some(mount)
    } else {
        tracing::debug!(mount = %value, "dropping mount without volume or source");
        None
    }
}

fn parse_table(raw: &[u8]) -> Result<Vec<Container>> {
    let mut lines = text_lines(raw);
    if let Some(first) = lines.first() {
        let lower = first.to_lowercase();
        if lower.contains("id") && lower.contains("image") {
            let _ = lines.remove(0);
        }
    }

    Ok(lines
        .iter()
        .filter_map(|line| {
            let row = parse_row(line);
            if row.is_none() {
                tracing::warn!(line = %line, "skipping unparseable container row");
            }
            row
        })
        .collect())
}

fn parse_row(line: &str) -> Option<Container> {
    if let Some(caps) = ROW.captures(line) {
        let field = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        return Some(row_to_container(
            field(1)?,
            field(2)?,
            field(3),
            field(4),
            field(5)?,
            field(6),
        ));
    }

    let mut tokens = line.split_whitespace();
    let id = tokens.next()?.to_string();
    let image = tokens.next()?.to_string();
    let os = tokens.next()?.to_string();
    let arch = tokens.next()?.to_string();
    let state = tokens.next()?.to_string();
    let rest: Vec<&str> = tokens.collect();
    let address = (!rest.is_empty()).then(|| rest.join(" "));
    Some(row_to_container(id, image, Some(os), Some(arch), state, address))
}

fn row_to_container(
    id: String,
    image: String,
    os: Option<String>,
    arch: Option<String>,
    state: String,
    address: Option<String>,
) -> Container {
    let mut container = Container::new(id, image, state);
    container.os = os;
    container.arch = arch;
    container.address = address;
    container
}
