//! ZIP package adapter.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractionManifest;
use crate::InstallError;
use crate::Result;
use crate::extract::ExtractObserver;
use crate::types::DestDir;

use super::common;

/// Extracts all file entries of a ZIP package into `dest`.
///
/// Directory entries are skipped; they only materialize as parents of the
/// files beneath them.
pub(crate) fn extract(
    archive_path: &Path,
    dest: &DestDir,
    manifest: &mut ExtractionManifest,
    observer: &mut dyn ExtractObserver,
) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| InstallError::ArchiveCorrupt(format!("failed to open zip archive: {e}")))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| InstallError::ArchiveCorrupt(format!("failed to read zip entry: {e}")))?;

        if !entry.is_file() {
            continue;
        }

        let name = PathBuf::from(entry.name());
        debug!(entry = %name.display(), "extracting zip entry");
        observer.on_entry(&name);
        common::write_entry(&name, &mut entry, dest, manifest)?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::extract::NoopObserver;
    use crate::test_utils::ZipTestBuilder;
    use tempfile::TempDir;

    fn write_fixture(temp: &TempDir, data: &[u8]) -> PathBuf {
        let path = temp.path().join("fixture.zip");
        std::fs::write(&path, data).expect("failed to write fixture");
        path
    }

    #[test]
    fn test_extract_skips_directory_entries() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let data = ZipTestBuilder::new()
            .add_directory("maps/")
            .add_file("maps/foo.yml", b"title: Foo")
            .build();
        let archive = write_fixture(&temp, &data);

        let out = TempDir::new().expect("failed to create out dir");
        let dest = DestDir::new(out.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        extract(&archive, &dest, &mut manifest, &mut NoopObserver).expect("should extract");

        // The directory entry produces no manifest item, but the directory
        // exists as the file's parent.
        assert_eq!(manifest.written(), &[out.path().join("maps/foo.yml")]);
        assert!(out.path().join("maps").is_dir());
    }

    #[test]
    fn test_extract_traversal_entry_fails() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let data = ZipTestBuilder::new()
            .add_file("../../etc/passwd", b"root:x:0:0")
            .build();
        let archive = write_fixture(&temp, &data);

        let out = TempDir::new().expect("failed to create out dir");
        let dest = DestDir::new(out.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        let result = extract(&archive, &dest, &mut manifest, &mut NoopObserver);
        assert!(matches!(result, Err(InstallError::PathEscape { .. })));
        assert!(manifest.is_empty());
        assert!(!out.path().join("../../etc/passwd").exists());
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let archive = write_fixture(&temp, b"this is not a zip file");

        let out = TempDir::new().expect("failed to create out dir");
        let dest = DestDir::new(out.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        let result = extract(&archive, &dest, &mut manifest, &mut NoopObserver);
        assert!(matches!(result, Err(InstallError::ArchiveCorrupt(_))));
    }
}
