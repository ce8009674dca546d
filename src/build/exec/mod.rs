//! Process execution for external tools.
//!
//! - [`environment`] - child-process environment derived from the configuration
//! - [`runner`] - [`CommandRunner`] seam, [`ProcessRunner`] and the fail-fast [`Executor`]
//! - [`tool_detection`] - interpreter lookup for the component build tool

mod environment;
#[cfg(test)]
pub(crate) mod recording;
mod runner;
mod tool_detection;

pub use environment::{Environment, library_path_var};
pub use runner::{CommandOutput, CommandRunner, Executor, Invocation, ProcessRunner};
pub use tool_detection::PYTHON;
