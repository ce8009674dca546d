//! Error types for orchestration operations.
//!
//! Every failure inside an operation is returned as an [`Error`]; nothing in
//! this module (or below it) terminates the process. The CLI entry point maps
//! [`Error::exit_code`] onto the process exit status.

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type alias for orchestration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while installing, building, archiving or bumping.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// An external tool ran and exited with a non-zero status.
    #[error("`{command}` exited with status {code}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status reported by the tool
        code: i32,
    },

    /// An external tool could not be started at all.
    #[error("failed to run `{command}`: {error}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        error: io::Error,
    },

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        error: io::Error,
    },

    /// A package archive expected by the installer does not exist.
    #[error("package archive not found: {}", path.display())]
    MissingPackage {
        /// Expected archive location
        path: PathBuf,
    },

    /// A version constant pattern did not match exactly once.
    #[error("expected exactly one match of `{pattern}` in {}, found {matches}", path.display())]
    PatternMismatch {
        /// File being patched
        path: PathBuf,
        /// Pattern that was searched for
        pattern: String,
        /// Number of matches found
        matches: usize,
    },

    /// The canonical version string is not a dotted sequence of integers.
    #[error("invalid version string `{0}`")]
    InvalidVersion(String),

    /// IO errors
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Directory traversal errors
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping errors
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Glob pattern errors
    #[error("{0}")]
    Glob(#[from] glob::PatternError),

    /// Zip archive errors
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Regular expression errors
    #[error("{0}")]
    Regex(#[from] regex::Error),

    /// Any other error
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Exit status the whole run should terminate with for this error.
    ///
    /// External tool failures propagate the tool's own status; everything
    /// else maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }

    /// Whether this error came from an external tool exiting non-zero.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

/// Convenient trait to attach a message to errors and empty options.
pub trait Context<T> {
    /// Adds `context` to the error, turning it into [`Error::GenericError`].
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Same as [`Context::context`] with a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Attaches the operation and path to a raw IO error.
pub trait ErrorExt<T> {
    /// Wraps the error in [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::build::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::build::Error::GenericError($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::build::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
