//! Stateless façade over the runtime CLI.
//!
//! Each operation runs one fixed argument template through the
//! [`CommandRunner`] and hands the output to the matching parser. The client
//! keeps no entity state between calls and never refreshes on its own after
//! a write.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quayside_common::config::QuaysideConfig;
use quayside_common::error::{QuaysideError, Result};
use quayside_common::types::{Container, Image, Volume};

use crate::exec::{CommandRunner, ExecOutput, ProcessRunner};
use crate::parse;
use crate::request::{NewContainer, NewVolume, required};

/// System status as reported by `system status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    /// The apiserver status line, or `"unknown"`.
    pub text: String,
    /// Whether `text` says the apiserver is running.
    pub running: bool,
}

impl SystemStatus {
    /// Classifies a status line.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        Self {
            running: parse::is_system_running(&text),
            text,
        }
    }
}

/// Client for the runtime's catalog of containers, images, and volumes.
///
/// Cheap to clone; clones share the runner.
#[derive(Clone)]
pub struct CatalogClient {
    program: PathBuf,
    runner: Arc<dyn CommandRunner>,
    timeout: Option<Duration>,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("program", &self.program)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client that spawns `program` as a child process.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_runner(program, Arc::new(ProcessRunner))
    }

    /// Creates a client with a custom runner.
    #[must_use]
    pub fn with_runner(program: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
            timeout: None,
        }
    }

    /// Creates a process-backed client from configuration.
    #[must_use]
    pub fn from_config(config: &QuaysideConfig) -> Self {
        Self::new(config.resolve_cli_path()).with_timeout(config.command_timeout())
    }

    /// Sets a deadline for every invocation; the child is killed on expiry.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the runtime CLI.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Lists all containers, running or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails or times out.
    pub async fn list_containers(&self) -> Result<Vec<Container>> {
        let output = self.run_checked(&["list", "--all", "--format", "json"]).await?;
        parse::parse_containers(&output.stdout)
    }

    /// Lists local images.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails or times out.
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        let output = self.run_checked(&["images", "list", "--format", "json"]).await?;
        parse::parse_images(&output.stdout)
    }

    /// Lists volumes.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails or times out.
    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        let output = self.run_checked(&["volume", "list", "--format", "json"]).await?;
        parse::parse_volumes(&output.stdout)
    }

    /// Reads the runtime's system status.
    ///
    /// A non-zero exit whose output still reports the apiserver state (the
    /// runtime exits non-zero while stopped) yields that state.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails without reporting a status line.
    pub async fn system_status(&self) -> Result<SystemStatus> {
        let output = self.run(&["system", "status"]).await?;
        if output.exit_code == 0 {
            return Ok(SystemStatus::from_text(parse::parse_system_status(&output.stdout)));
        }
        if let Some(line) = parse::system::find_status_line(&output.combined()) {
            tracing::debug!(exit_code = output.exit_code, status = %line, "status reported with non-zero exit");
            return Ok(SystemStatus::from_text(line));
        }
        Err(output.failure(&self.program))
    }

    /// Starts a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank or the CLI fails.
    pub async fn start_container(&self, id: &str) -> Result<()> {
        self.container_action("start", id).await
    }

    /// Stops a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank or the CLI fails.
    pub async fn stop_container(&self, id: &str) -> Result<()> {
        self.container_action("stop", id).await
    }

    /// Deletes a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank or the CLI fails.
    pub async fn delete_container(&self, id: &str) -> Result<()> {
        self.container_action("delete", id).await
    }

    /// Creates a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the CLI fails.
    pub async fn create_container(&self, request: &NewContainer) -> Result<()> {
        let args = request.to_args()?;
        tracing::info!(name = %request.name.trim(), image = %request.image.trim(), "creating container");
        self.write(&args).await
    }

    /// Starts the runtime's system services.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails.
    pub async fn start_system(&self) -> Result<()> {
        tracing::info!("starting runtime system");
        self.write(&strings(&["system", "start"])).await
    }

    /// Stops the runtime's system services.
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI fails.
    pub async fn stop_system(&self) -> Result<()> {
        tracing::info!("stopping runtime system");
        self.write(&strings(&["system", "stop"])).await
    }

    /// Creates a volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the CLI fails.
    pub async fn create_volume(&self, request: &NewVolume) -> Result<()> {
        let args = request.to_args()?;
        tracing::info!(name = %request.name.trim(), "creating volume");
        self.write(&args).await
    }

    /// Deletes a volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the CLI fails.
    pub async fn delete_volume(&self, name: &str) -> Result<()> {
        let name = required("volume name", name)?;
        tracing::info!(name, "deleting volume");
        self.write(&strings(&["volume", "delete", name])).await
    }

    async fn container_action(&self, action: &str, id: &str) -> Result<()> {
        let id = required("container id", id)?;
        tracing::info!(id, action, "container action");
        self.write(&strings(&[action, id])).await
    }

    async fn write(&self, args: &[String]) -> Result<()> {
        let _output = self.runner_call(args).await?.into_success(&self.program)?;
        Ok(())
    }

    async fn run_checked(&self, args: &[&str]) -> Result<ExecOutput> {
        self.run(args).await?.into_success(&self.program)
    }

    async fn run(&self, args: &[&str]) -> Result<ExecOutput> {
        self.runner_call(&strings(args)).await
    }

    async fn runner_call(&self, args: &[String]) -> Result<ExecOutput> {
        let call = self.runner.run(&self.program, args);
        match self.timeout {
            None => call.await,
            Some(after) => tokio::time::timeout(after, call)
                .await
                .map_err(|_| QuaysideError::Timeout {
                    program: self.program.display().to_string(),
                    after,
                })?,
        }
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}
