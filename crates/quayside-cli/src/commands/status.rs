//! `quay status`: Show the runtime's system status.

use quayside_catalog::CatalogClient;

/// Executes the `status` command.
///
/// # Errors
///
/// Returns an error if the runtime CLI fails without reporting a status.
pub async fn execute(client: &CatalogClient) -> anyhow::Result<()> {
    let status = client.system_status().await?;
    println!("{}", status.text);
    if !status.running {
        println!("Run `quay system start` to start the runtime.");
    }
    Ok(())
}
