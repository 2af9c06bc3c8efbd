//! Tooling Layer
//!
//! Command-line access to the versioning operations.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
