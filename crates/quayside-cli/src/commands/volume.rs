//! `quay volume`: List, create, and delete volumes.

use clap::{Args, Subcommand};
use quayside_catalog::CatalogClient;
use quayside_sdk::builder::{VolumeBuilder, parse_key_value};

use crate::output;

/// Arguments for the `volume` command.
#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// Volume action.
    #[command(subcommand)]
    pub action: VolumeAction,
}

/// Volume actions.
#[derive(Subcommand, Debug)]
pub enum VolumeAction {
    /// List volumes.
    Ls,
    /// Create a volume.
    Create {
        /// Volume name.
        name: String,
        /// Requested size, e.g. `10G`.
        #[arg(short, long)]
        size: Option<String>,
        /// Driver option as `KEY=VALUE`. Repeatable.
        #[arg(long = "opt")]
        options: Vec<String>,
        /// Label as `KEY=VALUE`. Repeatable.
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Delete volumes.
    Rm {
        /// Volume names.
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Executes the `volume` command.
///
/// # Errors
///
/// Returns an error if an argument is malformed or the runtime CLI fails.
pub async fn execute(client: &CatalogClient, args: VolumeArgs) -> anyhow::Result<()> {
    match args.action {
        VolumeAction::Ls => {
            let volumes = client.list_volumes().await?;
            if volumes.is_empty() {
                println!("No volumes found.");
            } else {
                print!("{}", output::volumes_table(&volumes));
            }
        }
        VolumeAction::Create {
            name,
            size,
            options,
            labels,
        } => {
            let mut builder = VolumeBuilder::new(name);
            if let Some(size) = size {
                builder = builder.size(size);
            }
            for pair in &options {
                let (key, value) = parse_key_value(pair)?;
                builder = builder.option(key, value);
            }
            for pair in &labels {
                let (key, value) = parse_key_value(pair)?;
                builder = builder.label(key, value);
            }
            let request = builder.build()?;
            client.create_volume(&request).await?;
            println!("{}", request.name);
        }
        VolumeAction::Rm { names } => {
            for name in &names {
                client.delete_volume(name).await?;
                println!("{name}");
            }
        }
    }
    Ok(())
}
