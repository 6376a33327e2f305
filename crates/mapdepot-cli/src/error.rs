//! Error conversion utilities for CLI.
//!
//! Converts mapdepot-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use mapdepot_core::InstallError;
use std::path::Path;

/// Converts `InstallError` to a user-friendly anyhow error with context
pub fn convert_install_error(err: InstallError, package: &Path) -> anyhow::Error {
    match err {
        InstallError::PathEscape { path } => {
            anyhow!(
                "Security violation: package '{}' attempted to write outside the destination with '{}'\n\
                 HINT: This package may be malicious. Do not install packages from untrusted sources.",
                package.display(),
                path.display()
            )
        }
        InstallError::ArchiveCorrupt(reason) => {
            anyhow!(
                "Invalid package '{}': {reason}\n\
                 HINT: The archive may be truncated or corrupted. Try downloading it again.",
                package.display()
            )
        }
        InstallError::ExtractionFailed { entry, source } => {
            anyhow!(
                "Failed to extract '{}' from '{}': {source}\n\
                 HINT: Files extracted before the failure remain in place; re-running the install overwrites them.",
                entry.display(),
                package.display()
            )
        }
        InstallError::PathNotFound { path } => {
            anyhow!("Path does not exist: {}", path.display())
        }
        InstallError::RelayTimeout { channel } => {
            anyhow!(
                "The elevated helper never connected its output channel ({channel})\n\
                 HINT: The helper may have failed to start. Check that the installer is on a local filesystem."
            )
        }
        InstallError::RelayBroken { source } => {
            anyhow!("Lost the elevated helper's output channel: {source}")
        }
        InstallError::SpawnFailed { command, source } => {
            anyhow!("Failed to start '{command}': {source}")
        }
        InstallError::HelperFailed { code } => {
            anyhow!(
                "The elevated helper exited with status {code}\n\
                 HINT: Its output above may name the failing entry."
            )
        }
        InstallError::UnsupportedPackage { path } => {
            anyhow!(
                "Unrecognized package format: {}\n\
                 HINT: Supported packages: zip, oramap, tar, tar.gz.",
                path.display()
            )
        }
        InstallError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {io_err}",
                package.display()
            )
        }
        InstallError::RelayUnsupported => {
            anyhow!("Output relay is not supported on this platform")
        }
    }
}

/// Adds package context to a core error result
pub fn add_package_context<T>(
    result: Result<T, InstallError>,
    package: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_install_error(e, package))
}
