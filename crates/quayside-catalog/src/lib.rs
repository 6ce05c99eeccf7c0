//! Resource catalog client for the container runtime CLI.
//!
//! - [`exec`]: runs the CLI as a child process.
//! - [`parse`]: turns its output into [`quayside_common::types`] records.
//! - [`client`]: one operation per runtime action.
//! - [`request`]: argument building for write operations.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod client;
pub mod exec;
pub mod parse;
pub mod request;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{CatalogClient, SystemStatus};
pub use exec::{CommandRunner, ExecOutput, ProcessRunner};
pub use request::{NewContainer, NewVolume};
