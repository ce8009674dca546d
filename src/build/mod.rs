//! Build orchestration for the engine, editor and server.
//!
//! An orchestration run takes an immutable [`Configuration`] and a list of
//! [`Operation`]s and executes them in order through an [`Orchestrator`]:
//!
//! - [`packages`] installs external dependencies into the install root
//! - [`sequencer`] builds engine components and documentation with waf
//! - [`editor`] builds and tests the Eclipse based editor and server
//! - [`archive`] uploads build artifacts to the archive host
//! - [`version`] bumps the release version
//!
//! External tools run through [`exec::Executor`], which stops the run at the
//! first non-zero exit status.

pub mod archive;
pub mod editor;
pub mod error;
pub mod exec;
pub mod operation;
pub mod orchestrator;
pub mod packages;
pub mod revision;
pub mod sequencer;
pub mod settings;
pub mod utils;
pub mod version;

pub use error::{Error, Result};
pub use operation::Operation;
pub use orchestrator::Orchestrator;
pub use settings::{ArchiveDestination, Configuration, ConfigurationBuilder, Platform};
