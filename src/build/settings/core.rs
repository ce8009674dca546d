//! Core Configuration struct and implementations.

use super::{ArchiveDestination, Platform};
use crate::error::{BuildError, CliError};
use std::path::{Path, PathBuf};

/// Process-wide state for one orchestration run.
///
/// Constructed once via [`ConfigurationBuilder`](super::ConfigurationBuilder)
/// and never mutated afterwards. Every operation derives its package lists,
/// build targets and destinations from this value.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Install root (`DYNAMO_HOME`).
    install_root: PathBuf,

    /// Checkout the orchestrator operates on.
    ///
    /// Packages, shared files, component sources and version files are all
    /// resolved relative to this directory.
    project_root: PathBuf,

    /// Eclipse installation used for editor and server product builds.
    eclipse_home: PathBuf,

    /// Platform the orchestrator runs on. Detected once.
    host: Platform,

    /// Platform components are built for. Defaults to `host`.
    target_platform: Platform,

    skip_tests: bool,
    skip_codesign: bool,
    no_colors: bool,

    /// Raw `host:path` archive destination, parsed on demand.
    archive_path: Option<String>,

    /// Version applied verbatim by `bump`.
    explicit_version: Option<String>,
}

impl Configuration {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        install_root: PathBuf,
        project_root: PathBuf,
        eclipse_home: PathBuf,
        host: Platform,
        target_platform: Platform,
        skip_tests: bool,
        skip_codesign: bool,
        no_colors: bool,
        archive_path: Option<String>,
        explicit_version: Option<String>,
    ) -> Self {
        Self {
            install_root,
            project_root,
            eclipse_home,
            host,
            target_platform,
            skip_tests,
            skip_codesign,
            no_colors,
            archive_path,
            explicit_version,
        }
    }

    /// Returns the install root.
    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Returns the project checkout root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the Eclipse installation directory.
    pub fn eclipse_home(&self) -> &Path {
        &self.eclipse_home
    }

    /// Returns the host platform.
    pub fn host(&self) -> Platform {
        self.host
    }

    /// Returns the target platform.
    pub fn target_platform(&self) -> Platform {
        self.target_platform
    }

    /// Whether the target differs from the host.
    pub fn is_cross_compiling(&self) -> bool {
        self.target_platform != self.host
    }

    /// Whether unit tests are skipped.
    ///
    /// Always true when cross-compiling, since the produced binaries cannot
    /// run on the host.
    pub fn skip_tests(&self) -> bool {
        self.skip_tests || self.is_cross_compiling()
    }

    /// Whether code signing is skipped.
    pub fn skip_codesign(&self) -> bool {
        self.skip_codesign
    }

    /// Whether colored output is disabled.
    pub fn no_colors(&self) -> bool {
        self.no_colors
    }

    /// Explicit version to apply when bumping, if any.
    pub fn explicit_version(&self) -> Option<&str> {
        self.explicit_version.as_deref()
    }

    /// Parses the archive destination.
    ///
    /// # Errors
    ///
    /// Usage error when `--archive-path` was not given or is malformed.
    pub fn archive_destination(&self) -> Result<ArchiveDestination, BuildError> {
        let raw = self.archive_path.as_deref().ok_or_else(|| {
            BuildError::Cli(CliError::MissingArgument {
                argument: "--archive-path".to_string(),
            })
        })?;
        ArchiveDestination::parse(raw)
    }

    /// `<install root>/ext`, the external-dependency tree.
    pub fn ext_dir(&self) -> PathBuf {
        self.install_root.join("ext")
    }

    /// Directories that must exist before any operation runs.
    pub fn common_dirs(&self) -> [PathBuf; 3] {
        [
            self.install_root.join("ext/lib/python"),
            self.install_root.join("lib/python"),
            self.install_root.join("share"),
        ]
    }

    /// Build output directory for an editor/server product.
    pub fn product_build_dir(&self, product: &str) -> PathBuf {
        self.project_root.join("tmp").join(product)
    }
}
