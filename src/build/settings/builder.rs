//! Builder for constructing Configuration.

use super::{Configuration, Platform};
use crate::error::{BuildError, CliError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Configuration`].
///
/// Every field is optional; unset fields resolve to their defaults in
/// [`ConfigurationBuilder::build`]:
///
/// - project root: the current directory
/// - install root: `<project root>/tmp/dynamo_home`
/// - eclipse home: `<user home>/eclipse`
/// - target platform: the host platform
///
/// # Examples
///
/// ```no_run
/// use dynamo_build::build::{ConfigurationBuilder, Platform};
///
/// # fn example() -> dynamo_build::Result<()> {
/// let config = ConfigurationBuilder::new()
///     .install_root("/opt/dynamo_home")
///     .target_platform(Platform::Armv6Darwin)
///     .skip_codesign(true)
///     .build()?;
/// assert!(config.skip_tests());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigurationBuilder {
    install_root: Option<PathBuf>,
    project_root: Option<PathBuf>,
    eclipse_home: Option<PathBuf>,
    host: Option<Platform>,
    target_platform: Option<Platform>,
    skip_tests: bool,
    skip_codesign: bool,
    no_colors: bool,
    archive_path: Option<String>,
    explicit_version: Option<String>,
}

impl ConfigurationBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the install root. Relative paths are resolved against the
    /// current directory.
    pub fn install_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.install_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the project checkout root.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the Eclipse installation directory.
    pub fn eclipse_home<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.eclipse_home = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides host detection. Only meant for tests.
    #[doc(hidden)]
    pub fn host(mut self, host: Platform) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the target platform.
    pub fn target_platform(mut self, platform: Platform) -> Self {
        self.target_platform = Some(platform);
        self
    }

    /// Skips unit tests.
    pub fn skip_tests(mut self, skip: bool) -> Self {
        self.skip_tests = skip;
        self
    }

    /// Skips code signing.
    pub fn skip_codesign(mut self, skip: bool) -> Self {
        self.skip_codesign = skip;
        self
    }

    /// Disables colored tool output.
    pub fn no_colors(mut self, no_colors: bool) -> Self {
        self.no_colors = no_colors;
        self
    }

    /// Sets the `host:path` archive destination.
    pub fn archive_path<S: Into<String>>(mut self, path: S) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    /// Sets the version `bump` applies verbatim.
    pub fn explicit_version<S: Into<String>>(mut self, version: S) -> Self {
        self.explicit_version = Some(version.into());
        self
    }

    /// Builds the configuration, resolving defaults.
    ///
    /// # Errors
    ///
    /// Fails when the current directory cannot be determined or when no
    /// home directory is available to derive the Eclipse default from.
    pub fn build(self) -> Result<Configuration> {
        let project_root = match self.project_root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        let install_root = match self.install_root {
            Some(root) => root.absolutize()?.into_owned(),
            None => project_root.join("tmp").join("dynamo_home"),
        };

        let eclipse_home = match self.eclipse_home {
            Some(home) => home,
            None => user_home()?.join("eclipse"),
        };

        let host = self.host.unwrap_or_else(Platform::host);
        let target_platform = self.target_platform.unwrap_or(host);

        Ok(Configuration::new(
            install_root,
            project_root,
            eclipse_home,
            host,
            target_platform,
            self.skip_tests,
            self.skip_codesign,
            self.no_colors,
            self.archive_path,
            self.explicit_version,
        ))
    }
}

/// Current user's home directory.
///
/// Reads `USERPROFILE` on Windows and `HOME` elsewhere, falling back to the
/// platform lookup when the variable is unset.
fn user_home() -> Result<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or_else(|| {
            BuildError::Cli(CliError::MissingArgument {
                argument: format!("--eclipse-home (no {var} set)"),
            })
        })
}
