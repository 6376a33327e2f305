//! Map package installation library.
//!
//! `mapdepot-core` installs user-supplied map packages into a per-mod maps
//! directory. Archives are extracted with streaming writes and a manifest of
//! everything written; entry names are validated so no package can write
//! outside its destination. When the platform keeps the destination behind
//! an administrator boundary, the installer relaunches itself elevated and
//! relays the helper's progress lines back over a named channel.
//!
//! # Examples
//!
//! ```no_run
//! use mapdepot_core::ElevationOverride;
//! use mapdepot_core::InstallRequest;
//! use mapdepot_core::Installer;
//! use mapdepot_core::NoopSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let installer = Installer::from_current_exe()?;
//! let request = InstallRequest {
//!     source: "desert-strike.oramap".into(),
//!     dest_root: "/opt/game/maps".into(),
//!     mod_id: "ra".into(),
//!     elevation: ElevationOverride::Auto,
//! };
//! let outcome = installer.install(&request, &mut NoopSink, &mut || {})?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod elevate;
pub mod error;
pub mod extract;
pub mod formats;
pub mod install;
pub mod launcher;
pub mod manifest;
pub mod relay;
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use elevate::ElevationMode;
pub use elevate::ElevationOverride;
pub use elevate::Platform;
pub use elevate::needs_elevation;
pub use error::InstallError;
pub use error::Result;
pub use extract::ExtractObserver;
pub use extract::NoopObserver;
pub use extract::extract_package;
pub use extract::extract_package_with_observer;
pub use install::InstallOutcome;
pub use install::InstallRequest;
pub use install::Installer;
pub use launcher::LaunchRequest;
pub use launcher::LineSink;
pub use launcher::NoopSink;
pub use launcher::RunOutcome;
pub use manifest::ExtractionManifest;
pub use relay::ChannelId;
pub use relay::RelayListener;
pub use relay::RelayReader;
pub use relay::RelayWriter;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryPath;
