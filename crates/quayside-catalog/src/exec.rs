//! External process execution.
//!
//! The executor is pure transport: it runs one program, drains both output
//! streams, and reports the exit status. It never interprets the output.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use quayside_common::error::{QuaysideError, Result};

/// Output from one runtime CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Standard output from the command.
    pub stdout: Vec<u8>,
    /// Standard error from the command.
    pub stderr: Vec<u8>,
    /// Exit code returned by the command.
    pub exit_code: i32,
}

impl ExecOutput {
    /// Creates a successful output carrying `stdout`.
    #[must_use]
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            exit_code: 0,
        }
    }

    /// Returns stdout followed by stderr as lossy UTF-8.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&self.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }
        text
    }

    /// Converts a non-zero exit into [`QuaysideError::ExecutionFailed`].
    ///
    /// # Errors
    ///
    /// Returns `ExecutionFailed` when `exit_code` is not zero.
    pub fn into_success(self, program: &Path) -> Result<Self> {
        if self.exit_code == 0 {
            return Ok(self);
        }
        Err(self.failure(program))
    }

    /// Describes this output as an `ExecutionFailed` error.
    #[must_use]
    pub fn failure(&self, program: &Path) -> QuaysideError {
        QuaysideError::ExecutionFailed {
            program: program.display().to_string(),
            exit_code: self.exit_code,
            output: self.combined().trim().to_string(),
        }
    }
}

/// Runs external programs on behalf of the catalog client.
///
/// Implementors must be stateless with respect to the calls they serve:
/// overlapping invocations are allowed.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// A non-zero exit is reported in [`ExecOutput::exit_code`], not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionFailed` with exit code `-1` if the process cannot
    /// be spawned or awaited.
    async fn run(&self, program: &Path, args: &[String]) -> Result<ExecOutput>;
}

/// Runs programs as child processes through `tokio::process`.
///
/// Both pipes are drained concurrently while waiting, so large outputs
/// cannot deadlock. Children are killed if the returned future is dropped,
/// which is how a caller-side timeout cancels a hung invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ExecOutput> {
        tracing::debug!(program = %program.display(), ?args, "running runtime CLI");

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| QuaysideError::ExecutionFailed {
                program: program.display().to_string(),
                exit_code: -1,
                output: e.to_string(),
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(
            program = %program.display(),
            exit_code,
            stdout_bytes = output.stdout.len(),
            "runtime CLI exited"
        );

        Ok(ExecOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code,
        })
    }
}
