//! Scripted [`CommandRunner`] for tests.
//!
//! Responses are keyed by the space-joined argument vector. The runner also
//! records every call and the peak number of overlapping calls.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quayside_common::error::{QuaysideError, Result};

use crate::exec::{CommandRunner, ExecOutput};

/// Canned reply for one argument vector.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Process ran and exited with this output.
    Output(ExecOutput),
    /// Process could not be spawned.
    SpawnFailure(String),
}

/// A runner that answers from a script instead of spawning processes.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Vec<String>>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedRunner {
    /// Creates a runner where every list command returns `[]` and status
    /// reports a running apiserver.
    #[must_use]
    pub fn healthy() -> Self {
        let runner = Self::default();
        runner.reply_ok("list --all --format json", "[]");
        runner.reply_ok("images list --format json", "[]");
        runner.reply_ok("volume list --format json", "[]");
        runner.reply_ok("system status", "apiserver is running\n");
        runner
    }

    /// Scripts a zero exit with `stdout`.
    pub fn reply_ok(&self, args: &str, stdout: &str) {
        self.reply(args, Reply::Output(ExecOutput::success(stdout)));
    }

    /// Scripts a non-zero exit with `stderr`.
    pub fn reply_exit(&self, args: &str, exit_code: i32, stderr: &str) {
        self.reply(
            args,
            Reply::Output(ExecOutput {
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
                exit_code,
            }),
        );
    }

    /// Scripts an arbitrary reply.
    pub fn reply(&self, args: &str, reply: Reply) {
        let _ = lock(&self.replies).insert(args.to_string(), reply);
    }

    /// Makes every call take `delay` (on the tokio clock) before replying.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// All argument vectors seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    /// Number of calls whose arguments join to `args`.
    pub fn count(&self, args: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.join(" ") == args)
            .count()
    }

    /// Highest number of calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ExecOutput> {
        lock(&self.calls).push(args.to_vec());
        let _guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = lock(&self.replies).get(&args.join(" ")).cloned();

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnFailure(message)) => Err(QuaysideError::ExecutionFailed {
                program: program.display().to_string(),
                exit_code: -1,
                output: message,
            }),
            None => Ok(ExecOutput::success(Vec::new())),
        }
    }
}

/// Counts a call as in flight until dropped, including when the caller
/// abandons the future.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = peak.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let _ = self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
