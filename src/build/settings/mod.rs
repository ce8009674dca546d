//! Configuration for an orchestration run.
//!
//! Holds the process-wide [`Configuration`], its [`ConfigurationBuilder`],
//! the [`Platform`] identifiers and the parsed [`ArchiveDestination`].

mod builder;
mod core;
mod destination;
mod platform;

pub use builder::ConfigurationBuilder;
pub use core::Configuration;
pub use destination::ArchiveDestination;
pub use platform::Platform;
