//! Platform identifiers for host and target.

use std::fmt;

/// Platform a component is built for or the orchestrator runs on.
///
/// The identifiers double as the tags used in package archive names
/// (`<name>-<platform>.tar.gz`) and as the value of the build tool's
/// `--platform` flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Platform {
    /// Linux desktop
    #[value(name = "linux")]
    Linux,
    /// macOS desktop
    #[value(name = "darwin")]
    Darwin,
    /// Windows desktop
    #[value(name = "win32")]
    Win32,
    /// iOS devices, only reachable by cross-compiling from a Darwin host
    #[value(name = "armv6-darwin")]
    Armv6Darwin,
}

impl Platform {
    /// Fixed cross-compilation target whose packages are always staged.
    pub const IOS: Platform = Platform::Armv6Darwin;

    /// Platform the current process runs on.
    ///
    /// Unix flavours without a dedicated identifier are treated as Linux.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::Darwin
        } else if cfg!(target_os = "windows") {
            Self::Win32
        } else {
            Self::Linux
        }
    }

    /// Identifier used in archive names, paths and tool flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Win32 => "win32",
            Self::Armv6Darwin => "armv6-darwin",
        }
    }

    /// Whether binaries for this platform are produced by a cross toolchain
    /// and installed under a per-platform `bin/` subdirectory.
    pub fn is_cross(&self) -> bool {
        matches!(self, Self::Armv6Darwin)
    }

    /// Whether the platform belongs to the Darwin family.
    pub fn is_darwin(&self) -> bool {
        matches!(self, Self::Darwin | Self::Armv6Darwin)
    }

    /// File extension of executables built for this platform.
    pub fn exe_extension(&self) -> &'static str {
        match self {
            Self::Win32 => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
