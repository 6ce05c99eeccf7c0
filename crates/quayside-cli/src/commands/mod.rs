//! CLI command definitions and dispatch.

pub mod create;
pub mod images;
pub mod inspect;
pub mod lifecycle;
pub mod ps;
pub mod status;
pub mod system;
pub mod volume;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use quayside_catalog::CatalogClient;
use quayside_common::config::QuaysideConfig;
use quayside_common::constants::BIN_NAME;

/// Quayside: control a container runtime through its CLI.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the runtime CLI binary.
    #[arg(long, global = true, env = "QUAYSIDE_CLI")]
    pub cli_path: Option<PathBuf>,

    /// Kill runtime CLI invocations that take longer than this many seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Diagnostic log format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether the runtime's system services are running.
    Status,
    /// List containers.
    Ps(ps::PsArgs),
    /// List local images.
    Images,
    /// Manage volumes.
    Volume(volume::VolumeArgs),
    /// Start containers.
    Start(lifecycle::ContainerIds),
    /// Stop containers.
    Stop(lifecycle::ContainerIds),
    /// Delete containers.
    Rm(lifecycle::ContainerIds),
    /// Create a container.
    Create(create::CreateArgs),
    /// Start or stop the runtime's system services.
    System(system::SystemArgs),
    /// Show one container as JSON.
    Inspect(inspect::InspectArgs),
    /// Poll the runtime and print every change until interrupted.
    Watch(watch::WatchArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if configuration loading or the command fails.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let client = CatalogClient::from_config(&config);
    tracing::debug!(program = %client.program().display(), "resolved runtime CLI");

    match cli.command {
        Command::Status => status::execute(&client).await,
        Command::Ps(args) => ps::execute(&client, &args).await,
        Command::Images => images::execute(&client).await,
        Command::Volume(args) => volume::execute(&client, args).await,
        Command::Start(args) => lifecycle::start(&client, &args).await,
        Command::Stop(args) => lifecycle::stop(&client, &args).await,
        Command::Rm(args) => lifecycle::remove(&client, &args).await,
        Command::Create(args) => create::execute(&client, args).await,
        Command::System(args) => system::execute(&client, &args).await,
        Command::Inspect(args) => inspect::execute(&client, &args).await,
        Command::Watch(args) => watch::execute(client, &config, &args).await,
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<QuaysideConfig> {
    let mut config = QuaysideConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.cli_path {
        config.cli_path = Some(path.clone());
    }
    if let Some(secs) = cli.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be at least one second");
        config.command_timeout_secs = Some(secs);
    }
    Ok(config)
}

/// Converts a whole-seconds flag into a duration.
pub(crate) fn seconds(secs: u64) -> anyhow::Result<Duration> {
    anyhow::ensure!(secs > 0, "interval must be at least one second");
    Ok(Duration::from_secs(secs))
}
