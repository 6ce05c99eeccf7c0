//! # quayside-common
//!
//! Shared domain records, error definitions, configuration models, and
//! constants used across the entire Quayside workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the value types every other crate exchanges.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod types;
