//! `quay watch`: Poll the runtime and print each published snapshot.

use std::fmt::Write as _;

use clap::Args;
use quayside_catalog::CatalogClient;
use quayside_common::config::QuaysideConfig;
use quayside_sdk::{PollingCoordinator, Snapshot};

use crate::output;

/// Arguments for the `watch` command.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between refreshes. Defaults to the configured interval.
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Executes the `watch` command until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the interval is zero or the signal handler cannot be
/// installed.
pub async fn execute(
    client: CatalogClient,
    config: &QuaysideConfig,
    args: &WatchArgs,
) -> anyhow::Result<()> {
    let interval = match args.interval {
        Some(secs) => super::seconds(secs)?,
        None => config.poll_interval(),
    };

    let coordinator = PollingCoordinator::new(client);
    let mut listener = coordinator.subscribe();
    coordinator.start_polling(interval).await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let outcome = loop {
        tokio::select! {
            signal = &mut ctrl_c => break signal,
            next = listener.next() => match next {
                Some(snapshot) => print!("{}", render(&snapshot)),
                None => break Ok(()),
            },
        }
    };

    coordinator.stop_polling().await;
    tracing::info!("watch stopped");
    Ok(outcome?)
}

/// Formats one snapshot for the terminal.
fn render(snapshot: &Snapshot) -> String {
    let stamp = snapshot
        .refreshed_at
        .map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S").to_string());
    let mut out = format!("== #{} at {stamp}: {}\n", snapshot.generation, snapshot.status);
    if let Some(err) = &snapshot.last_error {
        let _ = writeln!(out, "error: {err}\n");
        return out;
    }
    out.push_str(&output::containers_table(&snapshot.containers));
    out.push('\n');
    out.push_str(&output::images_table(&snapshot.images));
    out.push('\n');
    out.push_str(&output::volumes_table(&snapshot.volumes));
    out.push('\n');
    out
}
