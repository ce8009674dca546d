//! Current version-control revision.

use crate::build::{
    Configuration, Error, Result,
    exec::{CommandRunner, Executor},
};

/// Short identifier of the checked-out revision.
///
/// Runs `git log --oneline -n1` in the project root and takes the first token
/// of the first line. A non-zero git status fails like any other tool.
pub async fn current<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<String> {
    let stdout = exec
        .capture(
            exec.command("git")
                .args(["log", "--oneline", "-n1"])
                .current_dir(config.project_root()),
        )
        .await?;
    parse_short_revision(&stdout)
}

/// First whitespace-separated token of the first line of `git log --oneline`.
pub fn parse_short_revision(log: &str) -> Result<String> {
    log.lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
        .ok_or_else(|| Error::GenericError("git log returned no revision".into()))
}
