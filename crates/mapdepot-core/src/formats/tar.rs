//! Tar package adapter.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::ExtractionManifest;
use crate::InstallError;
use crate::Result;
use crate::extract::ExtractObserver;
use crate::types::DestDir;

use super::common;

/// Extracts all file entries of an uncompressed tar package into `dest`.
pub(crate) fn extract(
    archive_path: &Path,
    dest: &DestDir,
    manifest: &mut ExtractionManifest,
    observer: &mut dyn ExtractObserver,
) -> Result<()> {
    let file = File::open(archive_path)?;
    let archive = tar::Archive::new(BufReader::new(file));
    read_entries(archive, dest, manifest, observer)
}

/// Extracts all file entries of a gzip-compressed tar package into `dest`.
pub(crate) fn extract_gz(
    archive_path: &Path,
    dest: &DestDir,
    manifest: &mut ExtractionManifest,
    observer: &mut dyn ExtractObserver,
) -> Result<()> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let archive = tar::Archive::new(decoder);
    read_entries(archive, dest, manifest, observer)
}

/// Walks the tar entry stream, forwarding file entries to the shared writer.
///
/// The stream is single-pass; each entry's content is fully consumed by the
/// writer before the next header is read.
fn read_entries<R: Read>(
    mut archive: tar::Archive<R>,
    dest: &DestDir,
    manifest: &mut ExtractionManifest,
    observer: &mut dyn ExtractObserver,
) -> Result<()> {
    let entries = archive
        .entries()
        .map_err(|e| InstallError::ArchiveCorrupt(format!("failed to read tar entries: {e}")))?;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| InstallError::ArchiveCorrupt(format!("failed to read tar entry: {e}")))?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry
            .path()
            .map_err(|e| InstallError::ArchiveCorrupt(format!("invalid tar entry path: {e}")))?
            .into_owned();
        debug!(entry = %name.display(), "extracting tar entry");
        observer.on_entry(&name);
        common::write_entry(&name, &mut entry, dest, manifest)?;
    }

    Ok(())
}
