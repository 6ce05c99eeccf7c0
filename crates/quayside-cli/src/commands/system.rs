//! `quay system`: Start or stop the runtime's system services.

use clap::{Args, Subcommand};
use quayside_catalog::CatalogClient;

/// Arguments for the `system` command.
#[derive(Args, Debug)]
pub struct SystemArgs {
    /// Action to perform.
    #[command(subcommand)]
    pub action: SystemAction,
}

/// System service actions.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SystemAction {
    /// Start the runtime's services.
    Start,
    /// Stop the runtime's services.
    Stop,
}

/// Executes the `system` command, then reports the resulting status.
///
/// # Errors
///
/// Returns an error if the action fails.
pub async fn execute(client: &CatalogClient, args: &SystemArgs) -> anyhow::Result<()> {
    match args.action {
        SystemAction::Start => client.start_system().await?,
        SystemAction::Stop => client.stop_system().await?,
    }
    match client.system_status().await {
        Ok(status) => println!("{}", status.text),
        Err(e) => tracing::warn!(error = %e, "could not read status after system action"),
    }
    Ok(())
}
