//! Build orchestrator for the Dynamo engine, editor and server.
//!
//! This library provides the operations behind the `dynamo_build` command:
//! installing external packages, building engine components, building the
//! editor and server products, archiving artifacts and bumping versions.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod build;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BuildError, CliError, Result};
