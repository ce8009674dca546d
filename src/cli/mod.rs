//! Command line interface for the build orchestrator.
//!
//! Parses arguments, initializes logging and hands the resolved operations
//! to an [`Orchestrator`].

mod args;

pub use args::Args;

use crate::build::{Orchestrator, exec::ProcessRunner};
use crate::error::{CliError, Result};
use clap::Parser;

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            // --help and --version are reported on stdout and succeed
            if !e.use_stderr() {
                return Ok(());
            }
            return Err(CliError::Parse(e).into());
        }
    };

    init_logging(args.no_colors);

    let operations = args.operations()?;
    let config = args.configuration()?;
    log::debug!("Configuration: {:?}", config);

    let orchestrator = Orchestrator::new(config, ProcessRunner)?;
    orchestrator.run(&operations).await
}

/// Initializes `env_logger` with an `info` default filter.
fn init_logging(no_colors: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if no_colors {
        builder.write_style(env_logger::WriteStyle::Never);
    }
    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}
