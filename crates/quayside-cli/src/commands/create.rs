//! `quay create`: Create a container from an image.

use anyhow::Context;
use clap::Args;
use quayside_catalog::CatalogClient;
use quayside_sdk::builder::ContainerBuilder;

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Container name.
    #[arg(long)]
    pub name: String,

    /// Volume mapping as `VOLUME:TARGET`. Repeatable.
    #[arg(short = 'v', long = "volume")]
    pub volumes: Vec<String>,

    /// Image reference.
    pub image: String,
}

/// Executes the `create` command.
///
/// # Errors
///
/// Returns an error if a volume mapping is malformed or creation fails.
pub async fn execute(client: &CatalogClient, args: CreateArgs) -> anyhow::Result<()> {
    let mut builder = ContainerBuilder::new(args.name.clone()).image(args.image);
    for mapping in &args.volumes {
        builder = builder.volume_spec(mapping)?;
    }
    let request = builder.build()?;

    client
        .create_container(&request)
        .await
        .with_context(|| format!("failed to create container '{}'", args.name))?;
    println!("{}", request.name);
    Ok(())
}
