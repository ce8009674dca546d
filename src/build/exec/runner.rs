//! External command execution.
//!
//! Every external tool is started through a [`CommandRunner`] and awaited to
//! completion before the caller continues. [`Executor`] pairs a runner with
//! the run's [`Environment`] and turns non-zero exit codes into
//! [`Error::CommandFailed`], so the first failing tool stops the whole run.

use super::Environment;
use crate::build::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// One external command: argument vector, working directory, environment.
#[derive(Clone, Debug)]
pub struct Invocation<'a> {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: &'a Environment,
}

impl<'a> Invocation<'a> {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>, env: &'a Environment) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            cwd: None,
            env,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    /// Sets the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments after the program.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory, if one was set.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Full environment for the child.
    pub fn env(&self) -> &Environment {
        self.env
    }

    /// Command line rendered for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a command whose output is consumed.
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    /// Exit status
    pub code: i32,
    /// Standard output, lossily decoded
    pub stdout: String,
}

/// Starts external commands and waits for them.
///
/// The default implementation is [`ProcessRunner`]; tests substitute a
/// recording runner to observe invocation order without spawning anything.
pub trait CommandRunner {
    /// Runs the command with inherited stdio and returns its exit status.
    fn status(&self, invocation: &Invocation<'_>) -> impl Future<Output = Result<i32>>;

    /// Runs the command capturing stdout; stderr stays inherited.
    fn output(&self, invocation: &Invocation<'_>) -> impl Future<Output = Result<CommandOutput>>;
}

/// Runs commands as real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(invocation: &Invocation<'_>) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(invocation.program());
        cmd.args(invocation.get_args())
            .env_clear()
            .envs(invocation.env().iter())
            .stdin(Stdio::inherit());
        if let Some(cwd) = invocation.cwd() {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// Exit code of a finished child. Children killed by a signal report `1`.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

impl CommandRunner for ProcessRunner {
    async fn status(&self, invocation: &Invocation<'_>) -> Result<i32> {
        let status = Self::command(invocation)
            .status()
            .await
            .map_err(|error| Error::Spawn {
                command: invocation.display(),
                error,
            })?;
        Ok(exit_code(status))
    }

    async fn output(&self, invocation: &Invocation<'_>) -> Result<CommandOutput> {
        let spawn_error = |error: std::io::Error| Error::Spawn {
            command: invocation.display(),
            error,
        };
        // `Command::output` would pipe stderr too; only stdout is captured.
        let child = Self::command(invocation)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;
        let output = child.wait_with_output().await.map_err(spawn_error)?;
        Ok(CommandOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Runs commands in the run's environment and fails fast on non-zero exits.
#[derive(Debug)]
pub struct Executor<R = ProcessRunner> {
    runner: R,
    env: Environment,
}

impl<R: CommandRunner> Executor<R> {
    /// Creates an executor using `env` for every command.
    pub fn new(runner: R, env: Environment) -> Self {
        Self { runner, env }
    }

    /// Environment handed to every child.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Returns the underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Starts an invocation of `program` in this executor's environment.
    pub fn command(&self, program: impl AsRef<OsStr>) -> Invocation<'_> {
        Invocation::new(program, &self.env)
    }

    /// Runs `invocation` to completion.
    ///
    /// # Errors
    ///
    /// [`Error::CommandFailed`] carrying the tool's exit status when it is
    /// non-zero, [`Error::Spawn`] when the tool could not be started.
    pub async fn run(&self, invocation: Invocation<'_>) -> Result<()> {
        log::debug!("Running {}", invocation.display());
        let code = self.runner.status(&invocation).await?;
        check(&invocation, code)
    }

    /// Runs `invocation` and returns its standard output.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::run`].
    pub async fn capture(&self, invocation: Invocation<'_>) -> Result<String> {
        log::debug!("Running {}", invocation.display());
        let output = self.runner.output(&invocation).await?;
        check(&invocation, output.code)?;
        Ok(output.stdout)
    }
}

fn check(invocation: &Invocation<'_>, code: i32) -> Result<()> {
    if code == 0 {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: invocation.display(),
            code,
        })
    }
}
