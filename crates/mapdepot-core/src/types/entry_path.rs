//! Validated archive entry path.

use crate::InstallError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An archive entry name validated to stay inside the destination.
///
/// `EntryPath` can only be constructed through [`EntryPath::resolve`], which
/// rejects:
/// - Absolute names (including root and drive-prefix components)
/// - Parent-directory traversal (`..`)
/// - Null bytes
/// - Names that normalize to nothing
///
/// `.` components are normalized away, so the stored path is always a plain
/// relative path whose join onto the destination cannot leave it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath(PathBuf);

impl EntryPath {
    /// Validates an archive entry name.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::PathEscape` for any name that could resolve
    /// at or above the destination root, and for null bytes, which some
    /// filesystems would silently truncate into a different path.
    pub fn resolve(name: &Path) -> Result<Self> {
        if has_null_bytes(name) {
            return Err(InstallError::PathEscape {
                path: name.to_path_buf(),
            });
        }

        let mut normalized = PathBuf::new();
        for component in name.components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(InstallError::PathEscape {
                        path: name.to_path_buf(),
                    });
                }
                Component::CurDir => {}
                Component::Normal(part) => normalized.push(part),
            }
        }

        // An empty name would join to the destination root itself.
        if normalized.as_os_str().is_empty() {
            return Err(InstallError::PathEscape {
                path: name.to_path_buf(),
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the validated relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Checks if a path contains null bytes.
#[cfg(unix)]
fn has_null_bytes(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().contains(&b'\0')
}

/// Checks if a path contains null bytes.
#[cfg(not(unix))]
fn has_null_bytes(path: &Path) -> bool {
    path.to_str().is_none_or(|s| s.contains('\0'))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_relative_name() {
        let entry = EntryPath::resolve(Path::new("maps/foo.yml")).expect("should be valid");
        assert_eq!(entry.as_path(), Path::new("maps/foo.yml"));
    }

    #[test]
    fn test_reject_parent_traversal() {
        let names = [
            "../etc/passwd",
            "maps/../../etc/passwd",
            "maps/../../../etc/passwd",
            "..",
        ];
        for name in names {
            let result = EntryPath::resolve(Path::new(name));
            assert!(
                matches!(result, Err(InstallError::PathEscape { .. })),
                "name should be rejected: {name}"
            );
        }
    }

    #[test]
    fn test_reject_absolute() {
        let result = EntryPath::resolve(Path::new("/etc/passwd"));
        assert!(matches!(result, Err(InstallError::PathEscape { .. })));
    }

    #[test]
    fn test_reject_empty_and_dot_only() {
        assert!(EntryPath::resolve(Path::new("")).is_err());
        assert!(EntryPath::resolve(Path::new(".")).is_err());
        assert!(EntryPath::resolve(Path::new("./.")).is_err());
    }

    #[test]
    fn test_normalize_dot_components() {
        let entry = EntryPath::resolve(Path::new("maps/./foo.yml")).expect("should be valid");
        assert_eq!(entry.as_path(), Path::new("maps/foo.yml"));
    }

    #[test]
    #[cfg(unix)]
    fn test_reject_null_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = PathBuf::from(OsStr::from_bytes(b"maps/foo\0.yml"));
        let result = EntryPath::resolve(&name);
        assert!(matches!(result, Err(InstallError::PathEscape { .. })));
    }

    proptest! {
        /// Any name containing a parent-directory segment is rejected.
        #[test]
        fn prop_parent_segment_always_rejected(
            prefix in "[a-z]{0,8}",
            suffix in "[a-z]{0,8}",
        ) {
            let name = if prefix.is_empty() {
                format!("../{suffix}")
            } else {
                format!("{prefix}/../{suffix}")
            };
            let result = EntryPath::resolve(Path::new(&name));
            let is_path_escape = matches!(result, Err(InstallError::PathEscape { .. }));
            prop_assert!(is_path_escape);
        }

        /// Accepted names never contain traversal components after
        /// normalization.
        #[test]
        fn prop_accepted_names_are_plain_relative(
            parts in proptest::collection::vec("[a-z]{1,8}", 1..4),
        ) {
            let name = parts.join("/");
            let entry = EntryPath::resolve(Path::new(&name)).expect("plain names are valid");
            prop_assert!(entry.as_path().is_relative());
            prop_assert!(entry
                .as_path()
                .components()
                .all(|c| matches!(c, Component::Normal(_))));
        }
    }
}
