//! Child-process environment construction.
//!
//! The environment handed to every external tool is computed once from the
//! [`Configuration`] and the inherited process environment. The process's own
//! environment is never modified.

use crate::build::{Configuration, Error, Result};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Options for the Maven-based editor/server builds.
const MAVEN_OPTS: &str = "-Xms256m -Xmx700m -XX:MaxPermSize=1024m";

/// Complete, immutable environment for child processes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Builds the environment from the current process environment.
    pub fn inherit(config: &Configuration) -> Result<Self> {
        Self::from_base(config, std::env::vars_os())
    }

    /// Builds the environment from an explicit base set of variables.
    ///
    /// Everything in `base` is kept; the variables below are overridden:
    ///
    /// - `DYLD_LIBRARY_PATH` (Darwin host) or `LD_LIBRARY_PATH`:
    ///   `<root>/lib`, `<root>/ext/lib/<host>`
    /// - `PYTHONPATH`: `<root>/lib/python`, `<root>/ext/lib/python`
    /// - `DYNAMO_HOME`: `<root>`
    /// - `PATH`: `<root>/bin`, `<root>/ext/bin`, `<root>/ext/bin/<host>`,
    ///   followed by the inherited `PATH`
    /// - `MAVEN_OPTS` and the interpreter version selectors
    /// - `NOCOLOR` / `GTEST_COLOR` when colors are disabled
    pub fn from_base<I>(config: &Configuration, base: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut vars: BTreeMap<OsString, OsString> = base.into_iter().collect();
        let root = config.install_root();
        let host = config.host().as_str();

        vars.insert(
            library_path_var(config).into(),
            join([root.join("lib"), root.join("ext/lib").join(host)])?,
        );

        vars.insert(
            "PYTHONPATH".into(),
            join([root.join("lib/python"), root.join("ext/lib/python")])?,
        );

        vars.insert("DYNAMO_HOME".into(), root.as_os_str().to_owned());

        let mut paths = vec![
            root.join("bin"),
            root.join("ext/bin"),
            root.join("ext/bin").join(host),
        ];
        if let Some(existing) = vars.get(OsStr::new("PATH")) {
            paths.extend(std::env::split_paths(existing));
        }
        vars.insert("PATH".into(), join(paths)?);

        vars.insert("MAVEN_OPTS".into(), MAVEN_OPTS.into());

        // Legacy waf scripts require the 32-bit 2.6 interpreter on Darwin.
        vars.insert("VERSIONER_PYTHON_PREFER_32_BIT".into(), "yes".into());
        vars.insert("VERSIONER_PYTHON_VERSION".into(), "2.6".into());

        if config.no_colors() {
            vars.insert("NOCOLOR".into(), "1".into());
            vars.insert("GTEST_COLOR".into(), "no".into());
        }

        Ok(Self { vars })
    }

    /// Environment made of exactly `vars`, with no install-root overrides.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// All variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Name of the dynamic-library search variable for the host.
pub fn library_path_var(config: &Configuration) -> &'static str {
    if config.host().is_darwin() {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

fn join<I>(paths: I) -> Result<OsString>
where
    I: IntoIterator<Item = PathBuf>,
{
    std::env::join_paths(paths).map_err(|e| Error::GenericError(format!("invalid search path: {e}")))
}
