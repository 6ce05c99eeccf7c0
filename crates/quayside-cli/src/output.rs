//! Formatted output helpers for CLI commands.
//!
//! Provides left-aligned tables sized to their widest cell and the row
//! layouts shared by `ps`, `images`, `volume ls`, and `watch`.

use std::fmt::Write as _;

use quayside_common::types::{Container, Image, Volume};

const GAP: usize = 2;

/// Renders `rows` under `headers` as an aligned, newline-terminated table.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(ToString::to_string).collect();
    for row in std::iter::once(&header_cells).chain(rows) {
        let mut line = String::new();
        for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
            if i + 1 == widths.len() {
                line.push_str(cell);
            } else {
                let _ = write!(line, "{cell:<pad$}", pad = width + GAP);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `-` for a missing value.
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Container table: ID, IMAGE, PLATFORM, STATE, ADDR.
#[must_use]
pub fn containers_table(containers: &[Container]) -> String {
    let rows: Vec<Vec<String>> = containers
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.image.clone(),
                or_dash(c.platform().as_deref()),
                c.state.clone(),
                or_dash(c.address.as_deref()),
            ]
        })
        .collect();
    render_table(&["ID", "IMAGE", "PLATFORM", "STATE", "ADDR"], &rows)
}

/// Image table: REFERENCE, SIZE.
#[must_use]
pub fn images_table(images: &[Image]) -> String {
    let rows: Vec<Vec<String>> = images
        .iter()
        .map(|i| vec![i.reference.clone(), or_dash(i.size.as_deref())])
        .collect();
    render_table(&["REFERENCE", "SIZE"], &rows)
}

/// Volume table: NAME, FORMAT, CREATED, MOUNTPOINT.
#[must_use]
pub fn volumes_table(volumes: &[Volume]) -> String {
    let rows: Vec<Vec<String>> = volumes
        .iter()
        .map(|v| {
            vec![
                v.name.clone(),
                or_dash(v.format.as_deref()),
                v.created_at
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
                or_dash(v.mountpoint.as_deref().or(v.source.as_deref())),
            ]
        })
        .collect();
    render_table(&["NAME", "FORMAT", "CREATED", "MOUNTPOINT"], &rows)
}
