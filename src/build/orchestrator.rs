//! Run-level orchestration.
//!
//! This module provides the [`Orchestrator`] that validates a list of
//! [`Operation`]s up front and then executes them one after another.

use crate::build::{
    Configuration, Operation, archive,
    editor::{self, Product},
    exec::{CommandRunner, Environment, Executor, ProcessRunner},
    packages, sequencer,
    utils::fs,
    version,
};
use crate::error::Result;

/// Executes operations against a single [`Configuration`].
///
/// The child-process environment is computed once at construction and shared
/// by every operation of the run.
///
/// # Examples
///
/// ```no_run
/// use dynamo_build::build::{ConfigurationBuilder, Operation, Orchestrator};
/// use dynamo_build::build::exec::ProcessRunner;
///
/// # async fn example() -> dynamo_build::Result<()> {
/// let config = ConfigurationBuilder::new().build()?;
/// let orchestrator = Orchestrator::new(config, ProcessRunner)?;
/// orchestrator
///     .run(&[Operation::InstallExt, Operation::BuildEngine])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator<R = ProcessRunner> {
    config: Configuration,
    exec: Executor<R>,
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Creates an orchestrator whose tools inherit the current process
    /// environment.
    pub fn new(config: Configuration, runner: R) -> Result<Self> {
        let env = Environment::inherit(&config)?;
        Ok(Self::with_environment(config, runner, env))
    }

    /// Creates an orchestrator with an explicit child environment.
    pub fn with_environment(config: Configuration, runner: R, env: Environment) -> Self {
        Self {
            config,
            exec: Executor::new(runner, env),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn executor(&self) -> &Executor<R> {
        &self.exec
    }

    /// Runs `operations` in order, stopping at the first failure.
    ///
    /// Usage problems (a missing or malformed archive destination) are
    /// reported before any directory is touched or any tool is started.
    pub async fn run(&self, operations: &[Operation]) -> Result<()> {
        self.preflight(operations)?;

        for dir in self.config.common_dirs() {
            fs::create_dir_all(&dir, false).await?;
        }

        for &operation in operations {
            log::info!("Running {}", operation);
            self.dispatch(operation).await?;
        }
        Ok(())
    }

    fn preflight(&self, operations: &[Operation]) -> Result<()> {
        if operations.iter().any(Operation::needs_archive_destination) {
            self.config.archive_destination()?;
        }
        Ok(())
    }

    async fn dispatch(&self, operation: Operation) -> Result<()> {
        let config = &self.config;
        let exec = &self.exec;
        match operation {
            Operation::Distclean => self.distclean().await?,
            Operation::InstallExt => packages::install_external_packages(config, exec).await?,
            Operation::BuildEngine => sequencer::build_engine(config, exec).await?,
            Operation::ArchiveEngine => {
                let dest = config.archive_destination()?;
                archive::archive_engine(config, exec, &dest).await?
            }
            Operation::TestCr => editor::test_cr(config, exec).await?,
            Operation::BuildServer => editor::build_server(config, exec).await?,
            Operation::BuildEditor => editor::build_editor(config, exec).await?,
            Operation::ArchiveEditor => {
                let dest = config.archive_destination()?;
                archive::archive_product(config, exec, &dest, Product::Editor.as_str()).await?
            }
            Operation::ArchiveServer => {
                let dest = config.archive_destination()?;
                archive::archive_product(config, exec, &dest, Product::Server.as_str()).await?
            }
            Operation::BuildDocs => sequencer::build_docs(config, exec).await?,
            Operation::Bump => {
                version::bump(config, exec).await?;
            }
        }
        Ok(())
    }

    /// Removes the install root and recreates the common directories.
    async fn distclean(&self) -> crate::build::Result<()> {
        log::info!("Removing {}", self.config.install_root().display());
        fs::remove_dir_all(self.config.install_root()).await?;
        for dir in self.config.common_dirs() {
            fs::create_dir_all(&dir, false).await?;
        }
        Ok(())
    }
}
