//! Named operations selectable from the command line.

use crate::error::CliError;
use std::{fmt, str::FromStr};

/// One command of an orchestration run.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Remove the install root and recreate its skeleton
    Distclean,
    /// Install external packages
    InstallExt,
    /// Build every engine component
    BuildEngine,
    /// Upload the engine binary
    ArchiveEngine,
    /// Run the editor test suite
    TestCr,
    /// Build the server product
    BuildServer,
    /// Build the editor product
    BuildEditor,
    /// Upload the editor installers
    ArchiveEditor,
    /// Upload the server installers
    ArchiveServer,
    /// Build the reference documentation
    BuildDocs,
    /// Bump the release version
    Bump,
}

impl Operation {
    /// Every operation, in the order they are listed in help output.
    pub const ALL: [Operation; 11] = [
        Self::Distclean,
        Self::InstallExt,
        Self::BuildEngine,
        Self::ArchiveEngine,
        Self::TestCr,
        Self::BuildServer,
        Self::BuildEditor,
        Self::ArchiveEditor,
        Self::ArchiveServer,
        Self::BuildDocs,
        Self::Bump,
    ];

    /// Command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Distclean => "distclean",
            Self::InstallExt => "install_ext",
            Self::BuildEngine => "build_engine",
            Self::ArchiveEngine => "archive_engine",
            Self::TestCr => "test_cr",
            Self::BuildServer => "build_server",
            Self::BuildEditor => "build_editor",
            Self::ArchiveEditor => "archive_editor",
            Self::ArchiveServer => "archive_server",
            Self::BuildDocs => "build_docs",
            Self::Bump => "bump",
        }
    }

    /// Whether the operation uploads to the archive host.
    pub fn needs_archive_destination(&self) -> bool {
        matches!(
            self,
            Self::ArchiveEngine | Self::ArchiveEditor | Self::ArchiveServer
        )
    }

    /// Resolves every name, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Operation>, CliError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for Operation {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| CliError::UnknownCommand { name: s.to_string() })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
