//! Top-level install orchestration.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use tracing::info;
use tracing::warn;

use crate::ExtractionManifest;
use crate::InstallError;
use crate::Result;
use crate::elevate::ElevationMode;
use crate::elevate::ElevationOverride;
use crate::elevate::Platform;
use crate::extract;
use crate::extract::ExtractObserver;
use crate::formats;
use crate::launcher;
use crate::launcher::LaunchRequest;
use crate::launcher::LineSink;
use crate::launcher::RunOutcome;
use crate::types::DestDir;

/// Terminal result of one install operation.
#[derive(Debug)]
pub enum InstallOutcome {
    /// Installed in this process; the manifest lists every written path.
    Installed(ExtractionManifest),
    /// Installed by the elevated helper process. Its progress lines were
    /// relayed to the sink; the manifest lives in the helper.
    Delegated,
    /// The user dismissed the elevation prompt; nothing was installed.
    Cancelled,
}

/// One install request.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// The package to install: an archive or a bare map file.
    pub source: PathBuf,
    /// The maps root the package lands under (the mod subdirectory is
    /// created beneath it on demand).
    pub dest_root: PathBuf,
    /// The mod the package belongs to.
    pub mod_id: String,
    /// Caller override of the platform elevation decision.
    pub elevation: ElevationOverride,
}

/// Install orchestrator.
///
/// Holds the helper executable used for privileged relaunch and serializes
/// install operations: one in-flight install at a time, so two elevation
/// prompts never race.
#[derive(Debug)]
pub struct Installer {
    helper: PathBuf,
    platform: Platform,
    gate: Mutex<()>,
}

impl Installer {
    /// Creates an installer that relaunches `helper` for elevated installs.
    #[must_use]
    pub fn new(helper: impl Into<PathBuf>) -> Self {
        Self {
            helper: helper.into(),
            platform: Platform::current(),
            gate: Mutex::new(()),
        }
    }

    /// Creates an installer that relaunches the current executable.
    pub fn from_current_exe() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    /// Overrides the platform the elevation decision is made for.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Installs one package.
    ///
    /// Progress lines go to `sink` whether the install runs inline or in
    /// the elevated helper. `notify` is the package-set-changed signal; it
    /// fires exactly once, after a successful install, so the caller can
    /// reload its package catalog.
    ///
    /// The installed package's content is not validated here; whether it is
    /// a well-formed map is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` if the source or the destination root's
    /// parent is missing, extraction errors from the inline path, and
    /// launcher errors (including `HelperFailed` for a helper that ran and
    /// reported failure) from the elevated path. A dismissed elevation
    /// prompt is not an error; see [`InstallOutcome::Cancelled`].
    pub fn install(
        &self,
        request: &InstallRequest,
        sink: &mut dyn LineSink,
        notify: &mut dyn FnMut(),
    ) -> Result<InstallOutcome> {
        let _serialized = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        if !request.source.exists() {
            return Err(InstallError::PathNotFound {
                path: request.source.clone(),
            });
        }
        if let Some(parent) = request.dest_root.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            return Err(InstallError::PathNotFound {
                path: parent.to_path_buf(),
            });
        }

        let mode = ElevationMode::select(self.platform, request.elevation);
        info!(
            source = %request.source.display(),
            dest = %request.dest_root.display(),
            mod_id = %request.mod_id,
            %mode,
            "installing package"
        );

        if mode.is_elevated() {
            self.install_delegated(request, sink, notify)
        } else {
            self.install_inline(request, sink, notify)
        }
    }

    /// Relaunches the helper elevated and relays its progress.
    ///
    /// The helper is invoked with the elevation override pinned to `skip`,
    /// so the relaunched process always takes the inline path.
    fn install_delegated(
        &self,
        request: &InstallRequest,
        sink: &mut dyn LineSink,
        notify: &mut dyn FnMut(),
    ) -> Result<InstallOutcome> {
        let launch = LaunchRequest::new(&self.helper)
            .arg("install")
            .arg(&request.source)
            .arg(&request.dest_root)
            .arg("--mod")
            .arg(&request.mod_id)
            .arg("--elevation")
            .arg("skip");

        match launcher::run(&launch, ElevationMode::ElevatedViaChannel, sink)? {
            RunOutcome::Cancelled => {
                warn!("install cancelled at elevation prompt");
                Ok(InstallOutcome::Cancelled)
            }
            RunOutcome::Completed { status } if status.success() => {
                notify();
                Ok(InstallOutcome::Delegated)
            }
            RunOutcome::Completed { status } => Err(InstallError::HelperFailed {
                code: status.code().unwrap_or(-1),
            }),
        }
    }

    /// Extracts or copies the package in this process.
    fn install_inline(
        &self,
        request: &InstallRequest,
        sink: &mut dyn LineSink,
        notify: &mut dyn FnMut(),
    ) -> Result<InstallOutcome> {
        let dest = DestDir::create(request.dest_root.join(&request.mod_id))?;

        let manifest = if formats::detect_format(&request.source).is_some() {
            let mut observer = StatusObserver { sink };
            extract::extract_package_with_observer(&request.source, dest.as_path(), &mut observer)?
        } else {
            copy_map_file(&request.source, &dest, sink)?
        };

        notify();
        Ok(InstallOutcome::Installed(manifest))
    }
}

/// Formats the progress line for one entry.
///
/// This is the wire shape the helper writes over the relay and the parent
/// displays verbatim.
#[must_use]
pub fn status_line(name: &Path) -> String {
    format!("Status: Extracting {}", name.display())
}

/// Adapts a line sink into an extract observer emitting status lines.
struct StatusObserver<'a> {
    sink: &'a mut dyn LineSink,
}

impl ExtractObserver for StatusObserver<'_> {
    fn on_entry(&mut self, name: &Path) {
        self.sink.on_line(&status_line(name));
    }
}

/// Copies a bare map file into the destination, overwriting any existing
/// file of the same name.
fn copy_map_file(
    source: &Path,
    dest: &DestDir,
    sink: &mut dyn LineSink,
) -> Result<ExtractionManifest> {
    let file_name = source
        .file_name()
        .ok_or_else(|| InstallError::UnsupportedPackage {
            path: source.to_path_buf(),
        })?;

    let target = dest.as_path().join(file_name);
    sink.on_line(&status_line(Path::new(file_name)));
    std::fs::copy(source, &target)?;

    let mut manifest = ExtractionManifest::new(dest.as_path().to_path_buf());
    manifest.record(target);
    Ok(manifest)
}
