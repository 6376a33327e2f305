//! Elevation decision logic.

/// Host platform family, as far as the installer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Unix-like platforms. The installer is expected to already run with
    /// enough privilege to write the destination.
    Unix,
    /// Windows, where an administrator boundary separates the user from the
    /// protected install directory.
    Windows,
}

impl Platform {
    /// Returns the platform this process was compiled for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Returns `true` if installs on `platform` require a privileged relaunch.
///
/// This is a static table, not a probe of actual directory permissions.
#[must_use]
pub const fn needs_elevation(platform: Platform) -> bool {
    matches!(platform, Platform::Windows)
}

/// Caller override of the platform elevation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElevationOverride {
    /// Follow the platform decision.
    #[default]
    Auto,
    /// Always relaunch elevated.
    Force,
    /// Never relaunch; run inline. Used by the relaunched helper itself so
    /// it cannot recurse.
    Skip,
}

/// How a command is launched.
///
/// The launcher branches on this variant only; platform identity never
/// appears in its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationMode {
    /// Spawn as-is and capture standard output directly.
    Direct,
    /// Spawn through the platform elevator and stream output over a named
    /// relay channel.
    ElevatedViaChannel,
}

impl ElevationMode {
    /// Folds the caller override into the platform decision.
    #[must_use]
    pub const fn select(platform: Platform, overriding: ElevationOverride) -> Self {
        match overriding {
            ElevationOverride::Force => Self::ElevatedViaChannel,
            ElevationOverride::Skip => Self::Direct,
            ElevationOverride::Auto => {
                if needs_elevation(platform) {
                    Self::ElevatedViaChannel
                } else {
                    Self::Direct
                }
            }
        }
    }

    /// Returns `true` for the elevated variant.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::ElevatedViaChannel)
    }
}

impl std::fmt::Display for ElevationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::ElevatedViaChannel => write!(f, "elevated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_elevation_table() {
        assert!(!needs_elevation(Platform::Unix));
        assert!(needs_elevation(Platform::Windows));
    }

    #[test]
    fn test_select_auto_follows_platform() {
        assert_eq!(
            ElevationMode::select(Platform::Unix, ElevationOverride::Auto),
            ElevationMode::Direct
        );
        assert_eq!(
            ElevationMode::select(Platform::Windows, ElevationOverride::Auto),
            ElevationMode::ElevatedViaChannel
        );
    }

    #[test]
    fn test_select_force_and_skip_win() {
        assert_eq!(
            ElevationMode::select(Platform::Unix, ElevationOverride::Force),
            ElevationMode::ElevatedViaChannel
        );
        assert_eq!(
            ElevationMode::select(Platform::Windows, ElevationOverride::Skip),
            ElevationMode::Direct
        );
    }

    #[test]
    fn test_is_elevated() {
        assert!(ElevationMode::ElevatedViaChannel.is_elevated());
        assert!(!ElevationMode::Direct.is_elevated());
    }
}
