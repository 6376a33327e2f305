//! High-level package extraction API.

use std::path::Path;

use tracing::info;

use crate::ExtractionManifest;
use crate::InstallError;
use crate::Result;
use crate::formats;
use crate::formats::PackageFormat;
use crate::types::DestDir;

/// Callback for observing entries as they are extracted.
///
/// The extractor calls [`ExtractObserver::on_entry`] once per file entry,
/// before the entry's content is written, in archive order. Directory
/// entries are never reported.
pub trait ExtractObserver {
    /// Called when the extractor starts writing an entry.
    fn on_entry(&mut self, name: &Path);
}

/// No-op implementation of `ExtractObserver`.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ExtractObserver for NoopObserver {
    fn on_entry(&mut self, _name: &Path) {}
}

/// Extracts a package archive into the destination directory.
///
/// The archive format is detected from the file extension. File entries are
/// streamed to disk in fixed-size chunks, existing files are overwritten,
/// and the returned manifest lists every written path in archive order.
///
/// # Errors
///
/// Returns an error if:
/// - The destination directory is missing or not writable
/// - The path has no recognized archive extension
/// - The archive is structurally invalid (`ArchiveCorrupt`)
/// - An entry name resolves outside the destination (`PathEscape`)
/// - Writing an entry fails (`ExtractionFailed`; earlier entries remain
///   on disk)
///
/// # Examples
///
/// ```no_run
/// use mapdepot_core::extract_package;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manifest = extract_package("desert-strike.oramap", "/tmp/maps")?;
/// println!("wrote {} files", manifest.len());
/// # Ok(())
/// # }
/// ```
pub fn extract_package<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    dest_root: Q,
) -> Result<ExtractionManifest> {
    extract_package_with_observer(archive_path, dest_root, &mut NoopObserver)
}

/// Extracts a package archive, reporting each entry to `observer`.
///
/// See [`extract_package`] for the extraction contract.
pub fn extract_package_with_observer<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    dest_root: Q,
    observer: &mut dyn ExtractObserver,
) -> Result<ExtractionManifest> {
    let archive_path = archive_path.as_ref();
    let dest = DestDir::new(dest_root.as_ref())?;

    let format =
        formats::detect_format(archive_path).ok_or_else(|| InstallError::UnsupportedPackage {
            path: archive_path.to_path_buf(),
        })?;

    let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());
    match format {
        PackageFormat::Zip => formats::zip::extract(archive_path, &dest, &mut manifest, observer)?,
        PackageFormat::Tar => formats::tar::extract(archive_path, &dest, &mut manifest, observer)?,
        PackageFormat::TarGz => {
            formats::tar::extract_gz(archive_path, &dest, &mut manifest, observer)?;
        }
    }

    info!(
        archive = %archive_path.display(),
        dest = %dest.as_path().display(),
        files = manifest.len(),
        "package extracted"
    );
    Ok(manifest)
}
