//! `quay images`: List local images.

use quayside_catalog::CatalogClient;

use crate::output;

/// Executes the `images` command.
///
/// # Errors
///
/// Returns an error if the image listing fails.
pub async fn execute(client: &CatalogClient) -> anyhow::Result<()> {
    let images = client.list_images().await?;
    if images.is_empty() {
        println!("No images found.");
        return Ok(());
    }
    print!("{}", output::images_table(&images));
    Ok(())
}
