//! Remote archive destination parsing.

use crate::error::{BuildError, CliError};
use std::fmt;

/// Remote location artifacts are archived to, given as `host:path`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArchiveDestination {
    host: String,
    path: String,
}

impl ArchiveDestination {
    /// Parses `host:path`, splitting on the first `:`.
    pub fn parse(value: &str) -> Result<Self, BuildError> {
        match value.split_once(':') {
            Some((host, path)) if !host.is_empty() && !path.is_empty() => Ok(Self {
                host: host.to_string(),
                path: path.to_string(),
            }),
            _ => Err(BuildError::Cli(CliError::InvalidArguments {
                reason: format!("archive path must be of the form host:path, got `{value}`"),
            })),
        }
    }

    /// SSH-reachable host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Directory on the remote host.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `scp` target for a file named `name` inside the remote directory.
    pub fn file(&self, name: &str) -> String {
        format!("{self}/{name}")
    }
}

impl fmt::Display for ArchiveDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.path)
    }
}
