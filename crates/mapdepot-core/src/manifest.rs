//! Record of paths written by one extraction.

use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// The ordered record of file paths written by one install or extraction.
///
/// Paths are appended in archive iteration order as each entry finishes
/// writing, and every path is contained in `destination_root`. The manifest
/// is append-only while extraction runs and is returned by value once the
/// operation completes, so callers always observe it frozen.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    destination_root: PathBuf,
    written: Vec<PathBuf>,
}

impl ExtractionManifest {
    /// Creates an empty manifest rooted at `destination_root`.
    #[must_use]
    pub fn new(destination_root: PathBuf) -> Self {
        Self {
            destination_root,
            written: Vec::new(),
        }
    }

    /// Appends a successfully written path.
    pub(crate) fn record(&mut self, path: PathBuf) {
        debug_assert!(path.starts_with(&self.destination_root));
        self.written.push(path);
    }

    /// The destination directory this manifest is rooted at.
    #[must_use]
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// The written paths, in the order they were produced.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Number of files written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.written.len()
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Consumes the manifest, returning the written paths.
    #[must_use]
    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}
