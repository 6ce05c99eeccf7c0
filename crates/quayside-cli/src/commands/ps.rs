//! `quay ps`: List containers.

use clap::Args;
use quayside_catalog::CatalogClient;

use crate::output;

/// Arguments for the `ps` command.
#[derive(Args, Debug)]
pub struct PsArgs {
    /// Show all containers (including stopped).
    #[arg(short, long)]
    pub all: bool,
}

/// Executes the `ps` command.
///
/// # Errors
///
/// Returns an error if the container listing fails.
pub async fn execute(client: &CatalogClient, args: &PsArgs) -> anyhow::Result<()> {
    let containers: Vec<_> = client
        .list_containers()
        .await?
        .into_iter()
        .filter(|c| args.all || c.running)
        .collect();

    if containers.is_empty() {
        println!("No containers found.");
        return Ok(());
    }
    print!("{}", output::containers_table(&containers));
    Ok(())
}
