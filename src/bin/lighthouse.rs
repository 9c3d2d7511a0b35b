//! Lighthouse CLI Binary
//!
//! Command-line interface for the configuration property store.

use anyhow::Context;
use clap::Parser;
use lighthouse::logging::init_logging;
use lighthouse::tooling::cli::{Cli, CliContext};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.resolve_config().context("loading configuration")?;
    init_logging(Some(&config.logging)).context("initializing logging")?;
    let mut context = CliContext::new(config).context("opening property store")?;
    Ok(context.execute(&cli.command)?)
}
