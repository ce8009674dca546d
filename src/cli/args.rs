//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap and the conversion
//! of parsed arguments into a [`Configuration`] and a list of [`Operation`]s.

use crate::build::{Configuration, ConfigurationBuilder, Operation, Platform};
use crate::error::{CliError, Result};
use clap::Parser;
use std::path::PathBuf;

const COMMANDS_HELP: &str = "Commands:
  distclean       Remove the install root and recreate its skeleton
  install_ext     Install external packages into <dynamo-home>/ext
  build_engine    Build every engine component
  archive_engine  Upload the engine binary (requires --archive-path)
  test_cr         Run the editor test suite
  build_server    Build the server product
  build_editor    Build the editor product
  archive_editor  Upload the editor installers (requires --archive-path)
  archive_server  Upload the server installers (requires --archive-path)
  build_docs      Build the engine reference documentation
  bump            Bump the release version

Multiple commands run in the order given; the first failure stops the run.";

/// Build orchestrator for the engine, editor and server
#[derive(Parser, Debug)]
#[command(
    name = "dynamo_build",
    version,
    about = "Build orchestrator for the engine, editor and server",
    after_help = COMMANDS_HELP
)]
pub struct Args {
    /// Install root for built artifacts and external packages
    ///
    /// Defaults to `tmp/dynamo_home` under the current directory.
    #[arg(long, value_name = "PATH", env = "DYNAMO_HOME")]
    pub dynamo_home: Option<PathBuf>,

    /// Eclipse installation used to build the editor and server
    #[arg(long, value_name = "PATH")]
    pub eclipse_home: Option<PathBuf>,

    /// Target platform (defaults to the host platform)
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Skip unit tests
    #[arg(long)]
    pub skip_tests: bool,

    /// Skip code signing
    #[arg(long)]
    pub skip_codesign: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,

    /// Archive destination
    #[arg(long, value_name = "HOST:PATH")]
    pub archive_path: Option<String>,

    /// Version applied by `bump` instead of incrementing
    #[arg(long, value_name = "VERSION")]
    pub set_version: Option<String>,

    /// Commands to run, in order
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl Args {
    /// Resolves every command name.
    ///
    /// # Errors
    ///
    /// [`CliError::UnknownCommand`] for the first name not in the registry.
    pub fn operations(&self) -> std::result::Result<Vec<Operation>, CliError> {
        Operation::parse_all(&self.commands)
    }

    /// Builds the run configuration from the parsed options.
    pub fn configuration(&self) -> Result<Configuration> {
        let mut builder = ConfigurationBuilder::new()
            .skip_tests(self.skip_tests)
            .skip_codesign(self.skip_codesign)
            .no_colors(self.no_colors);

        if let Some(root) = &self.dynamo_home {
            builder = builder.install_root(root);
        }
        if let Some(eclipse) = &self.eclipse_home {
            builder = builder.eclipse_home(eclipse);
        }
        if let Some(platform) = self.platform {
            builder = builder.target_platform(platform);
        }
        if let Some(path) = &self.archive_path {
            builder = builder.archive_path(path.as_str());
        }
        if let Some(version) = &self.set_version {
            builder = builder.explicit_version(version.as_str());
        }

        builder.build()
    }
}
