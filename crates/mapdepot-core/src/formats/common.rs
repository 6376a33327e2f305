//! Shared extraction helpers used by the format adapters.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ExtractionManifest;
use crate::InstallError;
use crate::Result;
use crate::types::DestDir;
use crate::types::EntryPath;

/// Fixed chunk size for streaming entry content to disk.
///
/// Bounds peak memory for large entries; whole files are never buffered.
pub(crate) const COPY_CHUNK: usize = 4096;

/// Writes one file entry beneath the destination and records it.
///
/// The entry name is validated first, so nothing is written for a hostile
/// name. Parent directories are created as needed and an existing file at
/// the target is overwritten.
///
/// # Errors
///
/// Returns `InstallError::PathEscape` for names that resolve outside the
/// destination, and `InstallError::ExtractionFailed` for I/O failures while
/// creating or writing the target.
pub(crate) fn write_entry<R: Read>(
    name: &Path,
    reader: &mut R,
    dest: &DestDir,
    manifest: &mut ExtractionManifest,
) -> Result<()> {
    let entry = EntryPath::resolve(name)?;
    let target = dest.join(&entry);

    if let Some(parent) = target.parent() {
        create_dir_all(parent).map_err(|e| InstallError::ExtractionFailed {
            entry: name.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&target).map_err(|e| InstallError::ExtractionFailed {
        entry: name.to_path_buf(),
        source: e,
    })?;

    let mut buf = [0_u8; COPY_CHUNK];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| InstallError::ExtractionFailed {
                entry: name.to_path_buf(),
                source: e,
            })?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|e| InstallError::ExtractionFailed {
                entry: name.to_path_buf(),
                source: e,
            })?;
    }

    manifest.record(target);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_write_entry_creates_parents() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        let mut reader = Cursor::new(b"tile data".to_vec());
        write_entry(Path::new("maps/foo.yml"), &mut reader, &dest, &mut manifest)
            .expect("should write");

        let target = dest.as_path().join("maps/foo.yml");
        assert_eq!(
            std::fs::read(&target).expect("file should exist"),
            b"tile data"
        );
        assert_eq!(manifest.written(), &[target]);
    }

    #[test]
    fn test_write_entry_overwrites() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        let mut first = Cursor::new(b"old".to_vec());
        write_entry(Path::new("foo.yml"), &mut first, &dest, &mut manifest).expect("first write");
        let mut second = Cursor::new(b"new contents".to_vec());
        write_entry(Path::new("foo.yml"), &mut second, &dest, &mut manifest).expect("second write");

        let target = dest.as_path().join("foo.yml");
        assert_eq!(
            std::fs::read(&target).expect("file should exist"),
            b"new contents"
        );
    }

    #[test]
    fn test_write_entry_rejects_escape_without_writing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        let mut reader = Cursor::new(b"evil".to_vec());
        let result = write_entry(
            Path::new("../../etc/passwd"),
            &mut reader,
            &dest,
            &mut manifest,
        );
        assert!(matches!(result, Err(InstallError::PathEscape { .. })));
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_write_entry_streams_large_content() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should validate");
        let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());

        // Larger than one chunk so the copy loop runs more than once.
        let data = vec![0xAB_u8; COPY_CHUNK * 3 + 17];
        let mut reader = Cursor::new(data.clone());
        write_entry(Path::new("big.bin"), &mut reader, &dest, &mut manifest)
            .expect("should write");

        let written = std::fs::read(dest.as_path().join("big.bin")).expect("file should exist");
        assert_eq!(written, data);
    }
}
