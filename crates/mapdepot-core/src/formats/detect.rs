//! Package format detection.

use std::path::Path;

/// Supported package container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    /// ZIP archive, including `.oramap` map packages.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
}

/// Detects the package format from a file path.
///
/// Returns `None` for paths without a recognized archive extension. The
/// installer treats those as bare map files and copies them instead of
/// extracting.
#[must_use]
pub fn detect_format(path: &Path) -> Option<PackageFormat> {
    let extension = path.extension().and_then(|e| e.to_str())?;

    match extension.to_ascii_lowercase().as_str() {
        "zip" | "oramap" => Some(PackageFormat::Zip),
        "tar" => Some(PackageFormat::Tar),
        "tgz" | "gz" => Some(PackageFormat::TarGz),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_zip() {
        let path = PathBuf::from("package.zip");
        assert_eq!(detect_format(&path), Some(PackageFormat::Zip));
    }

    #[test]
    fn test_detect_oramap() {
        let path = PathBuf::from("desert-strike.oramap");
        assert_eq!(detect_format(&path), Some(PackageFormat::Zip));
    }

    #[test]
    fn test_detect_case_insensitive() {
        let path = PathBuf::from("PACKAGE.ZIP");
        assert_eq!(detect_format(&path), Some(PackageFormat::Zip));
    }

    #[test]
    fn test_detect_tar() {
        let path = PathBuf::from("package.tar");
        assert_eq!(detect_format(&path), Some(PackageFormat::Tar));
    }

    #[test]
    fn test_detect_tar_gz() {
        assert_eq!(
            detect_format(&PathBuf::from("package.tar.gz")),
            Some(PackageFormat::TarGz)
        );
        assert_eq!(
            detect_format(&PathBuf::from("package.tgz")),
            Some(PackageFormat::TarGz)
        );
    }

    #[test]
    fn test_detect_bare_map_file() {
        assert_eq!(detect_format(&PathBuf::from("mymap.yml")), None);
        assert_eq!(detect_format(&PathBuf::from("no_extension")), None);
    }
}
