//! Top-level error types for the build orchestrator.
//!
//! Usage errors ([`CliError`]) are raised before any external work begins and
//! exit with status 2. Failures inside operations are [`crate::build::Error`]s
//! and exit with the failing tool's own status.

use thiserror::Error;

/// Result type alias for orchestrator runs
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for an orchestration run
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI usage errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation errors
    #[error("{0}")]
    Build(#[from] crate::build::Error),
}

/// CLI usage errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Argument parsing failed; clap has already printed the diagnostic
    #[error("{0}")]
    Parse(#[from] clap::Error),

    /// Command name not present in the registry
    #[error("Unknown command {name}")]
    UnknownCommand {
        /// Name as given on the command line
        name: String,
    },
}

/// Exit status for usage errors.
pub const USAGE_EXIT_CODE: i32 = 2;

impl BuildError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cli(CliError::Parse(e)) => e.exit_code(),
            Self::Cli(_) => USAGE_EXIT_CODE,
            Self::Io(_) => 1,
            Self::Build(e) => e.exit_code(),
        }
    }

    /// Whether the error should be printed.
    ///
    /// A failing external tool has already written its own diagnostics, as
    /// has clap for a rejected command line; only the exit status is
    /// propagated for those.
    pub fn is_reported(&self) -> bool {
        match self {
            Self::Cli(CliError::Parse(_)) => false,
            Self::Build(e) => !e.is_command_failure(),
            _ => true,
        }
    }
}
