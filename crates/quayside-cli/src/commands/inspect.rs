//! `quay inspect`: Show one container as JSON.

use clap::Args;
use quayside_catalog::CatalogClient;
use quayside_common::error::QuaysideError;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container ID.
    pub id: String,
}

/// Executes the `inspect` command.
///
/// # Errors
///
/// Returns an error if the listing fails or no container has this id.
pub async fn execute(client: &CatalogClient, args: &InspectArgs) -> anyhow::Result<()> {
    let container = client
        .list_containers()
        .await?
        .into_iter()
        .find(|c| c.id == args.id)
        .ok_or_else(|| QuaysideError::NotFound {
            kind: "container",
            id: args.id.clone(),
        })?;
    println!("{}", serde_json::to_string_pretty(&container)?);
    Ok(())
}
