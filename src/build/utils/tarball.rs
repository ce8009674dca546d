//! gzip-compressed tar archives.
//!
//! Package archives are unpacked in-process with `tar` + `flate2`, which gives
//! the same resulting tree on every host. Extraction and packing run on the
//! blocking pool.

use crate::build::error::{Error, ErrorExt, Result};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Extracts `archive` into `dest`, creating `dest` as needed.
///
/// Entries keep their archived paths, permissions and symlinks; entries that
/// would escape `dest` are rejected by the unpacker.
pub async fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    log::info!("Extracting {} to {}", archive.display(), dest.display());

    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&dest).fs_context("creating directory", &dest)?;

        let file = File::open(&archive).fs_context("opening archive", &archive)?;
        let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tar.set_preserve_permissions(true);
        tar.set_overwrite(true);
        tar.unpack(&dest).fs_context("extracting archive", &archive)?;
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Extraction task panicked: {}", e)))?
}

/// Packs `base_dir/entry` into a new gzip-compressed tarball at `output`.
///
/// Archived paths are rooted at `entry`, matching `tar -C base_dir -cz entry`.
pub async fn create_tar_gz(base_dir: &Path, entry: &str, output: &Path) -> Result<PathBuf> {
    let source = base_dir.join(entry);
    log::info!("Packing {} into {}", source.display(), output.display());

    let entry = entry.to_string();
    let output = output.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        if !source.is_dir() {
            return Err(Error::GenericError(format!(
                "{} does not exist or is not a directory",
                source.display()
            )));
        }

        let file = File::create(&output).fs_context("creating tarball", &output)?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder.follow_symlinks(false);
        builder
            .append_dir_all(&entry, &source)
            .fs_context("archiving directory", &source)?;
        builder
            .into_inner()
            .and_then(|encoder| encoder.finish())
            .fs_context("finishing tarball", &output)?;
        Ok(output)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Packing task panicked: {}", e)))?
}
