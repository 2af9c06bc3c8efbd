//! ccnv CLI Binary
//!
//! Command-line interface for version stamps on ccnx names.

use anyhow::Context;
use ccnv::logging::init_logging;
use ccnv::tooling::cli::{Cli, CliContext};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = CliContext::new(cli.config.clone()).context("loading configuration")?;
    init_logging(Some(&context.logging_config(&cli))).context("initializing logging")?;

    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
