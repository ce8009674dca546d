//! External package installation into the install root.
//!
//! Packages are prebuilt `<name>-<platform>.tar.gz` archives under
//! `<project>/packages`. They are unpacked into `<root>/ext` in three passes:
//! platform-independent packages, host packages, and the iOS cross-compile
//! packages. The iOS pass always runs, whatever the target platform is, so a
//! single install tree can serve every build variant.

use crate::build::{
    Configuration, Error, Platform, Result,
    exec::{CommandRunner, Executor},
    utils::{fs, tarball},
};
use std::path::{Path, PathBuf};

/// Packages shared by every platform.
pub const PACKAGES_ALL: &[&str] = &[
    "protobuf-2.3.0",
    "waf-1.5.9",
    "gtest-1.2.1",
    "vectormathlibrary-r1649",
    "nvidia-texture-tools-2.0.6",
    "PIL-1.1.6",
    "junit-4.6",
    "protobuf-java-2.3.0",
    "openal-1.1",
    "maven-3.0.1",
    "vecmath",
    "vpx-v0.9.7-p1",
    "asciidoc-8.6.7",
];

/// Packages built for the host platform.
pub const PACKAGES_HOST: &[&str] = &[
    "protobuf-2.3.0",
    "gtest-1.2.1",
    "glut-3.7.6",
    "cg-2.1",
    "nvidia-texture-tools-2.0.6",
    "PIL-1.1.6",
    "openal-1.1",
    "PVRTexToolCL-2.08.28.0634",
    "vpx-v0.9.7-p1",
];

/// Packages built for the iOS cross-compilation target.
pub const PACKAGES_IOS: &[&str] = &["protobuf-2.3.0", "gtest-1.2.1"];

/// Build tool front-ends installed into `<root>/lib/python`.
const SHARED_PYTHON: &[&str] = &["waf_dynamo.py", "waf_content.py"];

/// Support files installed into `<root>/share`.
const SHARED_FILES: &[&str] = &[
    "valgrind-libasound.supp",
    "valgrind-libdlib.supp",
    "valgrind-python.supp",
    "engine_profile.mobileprovision",
];

/// Platform tag of a package archive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PackageCategory {
    /// Platform-independent content
    Common,
    /// Built for the host platform
    Host(Platform),
    /// Built for a cross-compilation target
    CrossTarget(Platform),
}

impl PackageCategory {
    /// Tag used in the archive name.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Host(p) | Self::CrossTarget(p) => p.as_str(),
        }
    }
}

/// A package name paired with the platform variant to install.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PackageSpec<'a> {
    /// Package name including its version
    pub name: &'a str,
    /// Archive variant
    pub category: PackageCategory,
}

impl PackageSpec<'_> {
    /// Archive file name, `<name>-<category>.tar.gz`.
    pub fn archive_name(&self) -> String {
        format!("{}-{}.tar.gz", self.name, self.category.tag())
    }

    /// Archive location under `packages_dir`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPackage`] when the archive does not exist.
    pub fn resolve(&self, packages_dir: &Path) -> Result<PathBuf> {
        let path = packages_dir.join(self.archive_name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::MissingPackage { path })
        }
    }
}

/// Every package to extract for `host`, in extraction order.
pub fn package_specs(host: Platform) -> Vec<PackageSpec<'static>> {
    let common = PACKAGES_ALL.iter().map(|&name| PackageSpec {
        name,
        category: PackageCategory::Common,
    });
    let host = PACKAGES_HOST.iter().map(move |&name| PackageSpec {
        name,
        category: PackageCategory::Host(host),
    });
    let ios = PACKAGES_IOS.iter().map(|&name| PackageSpec {
        name,
        category: PackageCategory::CrossTarget(Platform::IOS),
    });
    common.chain(host).chain(ios).collect()
}

/// Installs all external packages, script extensions and shared files.
///
/// Every archive is checked for existence before anything is extracted, so a
/// missing package leaves the install tree untouched.
pub async fn install_external_packages<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
) -> Result<()> {
    let packages_dir = config.project_root().join("packages");
    let ext = config.ext_dir();

    let archives = package_specs(config.host())
        .iter()
        .map(|spec| spec.resolve(&packages_dir))
        .collect::<Result<Vec<_>>>()?;

    for archive in &archives {
        tarball::extract_tar_gz(archive, &ext).await?;
    }

    install_eggs(&packages_dir, &ext, exec).await?;

    let share = config.project_root().join("share");
    let lib_python = config.install_root().join("lib/python");
    for name in SHARED_PYTHON {
        fs::copy_file(&share.join(name), &lib_python.join(name)).await?;
    }

    let home_share = config.install_root().join("share");
    for name in SHARED_FILES {
        fs::copy_file(&share.join(name), &home_share.join(name)).await?;
    }

    Ok(())
}

/// Installs every `packages/*.egg` into `<ext>/lib/python`.
async fn install_eggs<R: CommandRunner>(
    packages_dir: &Path,
    ext: &Path,
    exec: &Executor<R>,
) -> Result<()> {
    let pattern = packages_dir.join("*.egg");
    let mut eggs = glob::glob(&pattern.to_string_lossy())?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::GenericError(format!("Failed to list eggs: {}", e)))?;
    eggs.sort();

    let site = ext.join("lib/python");
    for egg in eggs {
        let name = egg
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("Installing {}", name);
        exec.run(
            exec.command("easy_install")
                .args(["-q", "-d"])
                .arg(&site)
                .arg("-N")
                .arg(&egg),
        )
        .await?;
    }
    Ok(())
}
