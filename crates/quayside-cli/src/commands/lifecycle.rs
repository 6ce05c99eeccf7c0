//! `quay start|stop|rm`: Container lifecycle actions.

use clap::Args;
use quayside_catalog::CatalogClient;

/// Container ids targeted by a lifecycle action.
#[derive(Args, Debug)]
pub struct ContainerIds {
    /// Container IDs.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Starts each container in turn.
///
/// # Errors
///
/// Returns an error if any start fails; earlier ones are not rolled back.
pub async fn start(client: &CatalogClient, args: &ContainerIds) -> anyhow::Result<()> {
    for id in &args.ids {
        client.start_container(id).await?;
        println!("{id}");
    }
    Ok(())
}

/// Stops each container in turn.
///
/// # Errors
///
/// Returns an error if any stop fails.
pub async fn stop(client: &CatalogClient, args: &ContainerIds) -> anyhow::Result<()> {
    for id in &args.ids {
        client.stop_container(id).await?;
        println!("{id}");
    }
    Ok(())
}

/// Deletes each container in turn.
///
/// # Errors
///
/// Returns an error if any delete fails.
pub async fn remove(client: &CatalogClient, args: &ContainerIds) -> anyhow::Result<()> {
    for id in &args.ids {
        client.delete_container(id).await?;
        println!("{id}");
    }
    Ok(())
}
