//! Command runner that records invocations instead of spawning them.

use super::{CommandOutput, CommandRunner, Invocation};
use crate::build::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// One recorded invocation.
#[derive(Clone, Debug)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Call {
    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// Records every invocation and answers with scripted results.
///
/// Exit codes and stdout are keyed by program name; unscripted programs
/// succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Call>>,
    failures: HashMap<String, i32>,
    outputs: HashMap<String, String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every invocation of `program` exit with `code`.
    pub fn fail(mut self, program: &str, code: i32) -> Self {
        self.failures.insert(program.to_string(), code);
        self
    }

    /// Makes `program` print `stdout`.
    pub fn stdout(mut self, program: &str, stdout: &str) -> Self {
        self.outputs.insert(program.to_string(), stdout.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }

    fn record(&self, invocation: &Invocation<'_>) -> String {
        let program = invocation.program().to_string_lossy().into_owned();
        self.calls.borrow_mut().push(Call {
            program: program.clone(),
            args: invocation
                .get_args()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            cwd: invocation.cwd().map(|p| p.to_path_buf()),
        });
        program
    }
}

impl CommandRunner for RecordingRunner {
    async fn status(&self, invocation: &Invocation<'_>) -> Result<i32> {
        let program = self.record(invocation);
        Ok(self.failures.get(&program).copied().unwrap_or(0))
    }

    async fn output(&self, invocation: &Invocation<'_>) -> Result<CommandOutput> {
        let program = self.record(invocation);
        Ok(CommandOutput {
            code: self.failures.get(&program).copied().unwrap_or(0),
            stdout: self.outputs.get(&program).cloned().unwrap_or_default(),
        })
    }
}
