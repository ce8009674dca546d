//! Uploading build artifacts to the archive host.
//!
//! Artifacts are copied with `scp` and the remote side is driven with single
//! `ssh` commands. The engine binary is stored under a revision-specific name
//! and a stable alias is then repointed at it with one `ln -sfn`, so readers
//! of the alias never observe a half-written file.

use crate::build::{
    ArchiveDestination, Configuration, Error, Platform, Result,
    exec::{CommandRunner, Executor},
    revision,
    utils::tarball,
};
use std::path::{Path, PathBuf};

/// Base name of the engine executable.
pub const ENGINE_NAME: &str = "dmengine";

/// Creates the remote directory if it does not exist yet.
async fn ensure_remote_dir<R: CommandRunner>(
    exec: &Executor<R>,
    dest: &ArchiveDestination,
) -> Result<()> {
    exec.run(
        exec.command("ssh")
            .arg(dest.host())
            .arg(format!("mkdir -p {}", dest.path())),
    )
    .await
}

/// Rewrites a Windows path into the MSYS form `scp` understands there,
/// e.g. `C:\dynamo_home` becomes `/C/dynamo_home`.
pub fn msys_path(path: &Path) -> PathBuf {
    let path = path.to_string_lossy().replace('\\', "/");
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) => PathBuf::from(format!("/{}{}", drive, chars.as_str())),
        _ => PathBuf::from(path),
    }
}

/// Local path of the built engine executable.
///
/// Cross-compiled engines are installed under `bin/<target>/`.
pub fn engine_binary(config: &Configuration) -> PathBuf {
    let target = config.target_platform();
    let root = if target == Platform::Win32 {
        msys_path(config.install_root())
    } else {
        config.install_root().to_path_buf()
    };

    let mut bin_dir = root.join("bin");
    if target.is_cross() {
        bin_dir.push(target.as_str());
    }
    bin_dir.join(format!("{}{}", ENGINE_NAME, target.exe_extension()))
}

/// Uploads the engine as `dmengine<ext>.<revision>` and repoints the
/// `dmengine<ext>` alias at it.
pub async fn archive_engine<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
    dest: &ArchiveDestination,
) -> Result<()> {
    ensure_remote_dir(exec, dest).await?;

    let revision = revision::current(config, exec).await?;
    let exe = format!("{}{}", ENGINE_NAME, config.target_platform().exe_extension());
    let versioned = format!("{exe}.{revision}");

    log::info!("Archiving {} to {}", versioned, dest);
    exec.run(
        exec.command("scp")
            .arg(engine_binary(config))
            .arg(dest.file(&versioned)),
    )
    .await?;

    exec.run(
        exec.command("ssh")
            .arg(dest.host())
            .arg(format!("ln -sfn {} {}/{}", versioned, dest.path(), exe)),
    )
    .await
}

/// Uploads the installers and a repository snapshot of an editor/server
/// product build.
pub async fn archive_product<R: CommandRunner>(
    config: &Configuration,
    exec: &Executor<R>,
    dest: &ArchiveDestination,
    product: &str,
) -> Result<()> {
    let build_dir = config.product_build_dir(product);
    ensure_remote_dir(exec, dest).await?;

    for installer in installers(&build_dir)? {
        exec.run(exec.command("scp").arg(&installer).arg(dest.to_string()))
            .await?;
    }

    let snapshot = build_dir.join(format!("{product}_repository.tgz"));
    tarball::create_tar_gz(&build_dir, "repository", &snapshot).await?;
    exec.run(exec.command("scp").arg(&snapshot).arg(dest.to_string()))
        .await
}

/// Installer zips under `<build>/I.*/`, sorted.
fn installers(build_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = build_dir.join("I.*").join("*.zip");
    let mut found = glob::glob(&pattern.to_string_lossy())?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::GenericError(format!("Failed to list installers: {}", e)))?;
    found.sort();
    Ok(found)
}
