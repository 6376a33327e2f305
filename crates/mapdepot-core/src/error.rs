//! Error types for package installation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `InstallError`.
pub type Result<T> = std::result::Result<T, InstallError>;

/// Errors that can occur while installing a map package.
#[derive(Error, Debug)]
pub enum InstallError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive framing is invalid or the container is damaged.
    #[error("corrupt package archive: {0}")]
    ArchiveCorrupt(String),

    /// Archive entry resolves outside the destination directory.
    #[error("archive entry escapes destination: {path}")]
    PathEscape {
        /// The offending entry name.
        path: PathBuf,
    },

    /// Writing one entry to disk failed mid-stream.
    #[error("failed to extract {entry}: {source}")]
    ExtractionFailed {
        /// The entry being written when the failure occurred.
        entry: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The relay writer never connected within the connect window.
    #[error("relay channel {channel} did not connect in time")]
    RelayTimeout {
        /// The channel identifier that timed out.
        channel: String,
    },

    /// The relay transport failed after the writer had connected.
    #[error("relay channel failed mid-stream: {source}")]
    RelayBroken {
        /// The underlying transport failure.
        source: std::io::Error,
    },

    /// A required path was missing before any work started.
    #[error("path does not exist: {path}")]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Child process creation failed outright.
    #[error("failed to spawn {command}: {source}")]
    SpawnFailed {
        /// The command that could not be started.
        command: String,
        /// The underlying spawn failure.
        source: std::io::Error,
    },

    /// The elevated helper ran but reported failure.
    #[error("elevated helper exited with status {code}")]
    HelperFailed {
        /// The helper's exit code.
        code: i32,
    },

    /// The package file is not a recognized archive or map file.
    #[error("unsupported package format: {path}")]
    UnsupportedPackage {
        /// The package path.
        path: PathBuf,
    },

    /// The named relay transport is not available on this platform.
    #[error("output relay is not supported on this platform")]
    RelayUnsupported,
}

impl InstallError {
    /// Returns `true` if this error indicates hostile archive input.
    ///
    /// A hostile-input error means the package tried to write outside the
    /// destination directory and the install was aborted before anything
    /// was written for that entry.
    #[must_use]
    pub const fn is_hostile_input(&self) -> bool {
        matches!(self, Self::PathEscape { .. })
    }

    /// Returns `true` if this error was raised before any file was written.
    ///
    /// Precondition and launch failures leave the destination untouched;
    /// extraction failures may leave earlier entries on disk.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. } | Self::UnsupportedPackage { .. } | Self::SpawnFailed { .. }
        )
    }
}
