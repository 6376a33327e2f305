//! Validated destination directory type.

use crate::InstallError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

use super::EntryPath;

/// A validated destination directory for package extraction.
///
/// This type represents a directory that has been checked to:
/// - Exist on the filesystem
/// - Be a directory (not a file)
/// - Be writable by the current process
/// - Be represented as an absolute canonical path
///
/// Every path the extractor writes is produced by joining a validated
/// [`EntryPath`] onto a `DestDir`, so the two types together carry the
/// containment guarantee for the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` after validating the path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path exists but is not a directory
    /// - The path cannot be canonicalized
    /// - The directory is not writable (on Unix)
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(InstallError::PathNotFound { path });
        }

        if !path.is_dir() {
            return Err(InstallError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            InstallError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        // Check effective write permission up front so a read-only
        // destination fails before any entry is processed (Unix only).
        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
                InstallError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path contains null byte",
                ))
            })?;

            // SAFETY: access() is safe to call with a valid C string. The
            // pointer is valid for the duration of the call and the call
            // does not retain or modify it.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(InstallError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("directory is not writable: {}", canonical.display()),
                )));
            }
        }

        Ok(Self(canonical))
    }

    /// Creates the directory (and missing ancestors) if needed, then
    /// validates it like [`DestDir::new`].
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Self::new(path)
    }

    /// Returns the canonical path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a validated entry path onto this destination.
    #[must_use]
    pub fn join(&self, entry: &EntryPath) -> PathBuf {
        self.0.join(entry.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_valid() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("should validate");
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_missing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let missing = temp.path().join("nope");
        let result = DestDir::new(&missing);
        assert!(matches!(result, Err(InstallError::PathNotFound { .. })));
    }

    #[test]
    fn test_dest_dir_rejects_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "data").expect("failed to write");
        let result = DestDir::new(&file);
        assert!(matches!(result, Err(InstallError::Io(_))));
    }

    #[test]
    fn test_dest_dir_create_missing_tree() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("maps").join("ra");
        let dest = DestDir::create(&nested).expect("should create and validate");
        assert!(dest.as_path().ends_with("maps/ra"));
        assert!(nested.is_dir());
    }

    #[test]
    fn test_dest_dir_create_is_idempotent() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("maps");
        let first = DestDir::create(&nested).expect("first create");
        let second = DestDir::create(&nested).expect("second create");
        assert_eq!(first, second);
    }
}
