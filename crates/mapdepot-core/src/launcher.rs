//! Child process launching with optional privilege elevation.
//!
//! The launcher runs one command and forwards its output lines to a caller
//! sink. Without elevation the child's standard output is captured directly;
//! with elevation the child is started through the platform elevator and
//! writes its lines over a named relay channel instead, since a privilege
//! boundary separates the two processes.
//!
//! Reads are blocking in both cases. End-of-stream on the output source and
//! child exit are independent signals; the launcher drains the source to
//! end-of-stream and then waits on the process, so both conditions hold
//! before an outcome is reported.

#[cfg(unix)]
use std::ffi::OsStr;
use std::ffi::OsString;
use std::io::BufRead;
use std::io::BufReader;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;

use tracing::debug;
use tracing::info;
#[cfg(unix)]
use tracing::warn;

use crate::InstallError;
use crate::Result;
use crate::elevate::ElevationMode;

/// Flag used to hand the relay channel identifier to the elevated child.
pub const RELAY_FLAG: &str = "--relay";

/// The platform elevator command used for `ElevatedViaChannel` launches.
#[cfg(unix)]
const ELEVATOR: &str = "pkexec";

/// pkexec exit status when the user dismisses the authentication dialog.
#[cfg(unix)]
const ELEVATION_DISMISSED: i32 = 126;

/// pkexec exit status when authorization is denied outright.
#[cfg(unix)]
const ELEVATION_DENIED: i32 = 127;

/// Consumer of output lines produced by a launched child.
pub trait LineSink {
    /// Called once per line, in the order the child produced them.
    fn on_line(&mut self, line: &str);
}

/// No-op implementation of `LineSink`.
#[derive(Debug, Default)]
pub struct NoopSink;

impl LineSink for NoopSink {
    fn on_line(&mut self, _line: &str) {}
}

/// A command to launch, with its argument vector.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    command: OsString,
    args: Vec<OsString>,
}

impl LaunchRequest {
    /// Creates a request for `command` with no arguments.
    #[must_use]
    pub fn new(command: impl Into<OsString>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command, for error reporting.
    fn command_display(&self) -> String {
        self.command.to_string_lossy().into_owned()
    }
}

/// Terminal outcome of one launch.
///
/// Dismissing the elevation prompt is an expected user choice, so it is a
/// variant here rather than an error.
#[derive(Debug)]
pub enum RunOutcome {
    /// The child ran to completion.
    Completed {
        /// The child's exit status.
        status: ExitStatus,
    },
    /// The user dismissed the elevation prompt; nothing ran.
    Cancelled,
}

impl RunOutcome {
    /// Returns `true` if the child ran and exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Completed { status } if status.success())
    }
}

/// Runs a command, forwarding its output lines to `sink`.
///
/// With [`ElevationMode::Direct`] the child's standard output is piped and
/// read line by line. With [`ElevationMode::ElevatedViaChannel`] a fresh
/// relay channel is allocated, its identifier appended to the child's
/// arguments as `--relay <id>`, and the child started through the platform
/// elevator; lines then arrive over the channel.
///
/// # Errors
///
/// Returns `SpawnFailed` if the child cannot be started, `RelayTimeout` if
/// an elevated child never connects its writer end, and `RelayBroken` for
/// mid-stream transport failures. Prompt dismissal is not an error; see
/// [`RunOutcome::Cancelled`].
pub fn run(
    request: &LaunchRequest,
    mode: ElevationMode,
    sink: &mut dyn LineSink,
) -> Result<RunOutcome> {
    match mode {
        ElevationMode::Direct => run_direct(request, sink),
        ElevationMode::ElevatedViaChannel => run_elevated(request, sink),
    }
}

/// Spawns the child as-is and pumps its piped standard output.
fn run_direct(request: &LaunchRequest, sink: &mut dyn LineSink) -> Result<RunOutcome> {
    info!(command = %request.command_display(), "launching");
    let mut child = Command::new(&request.command)
        .args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| InstallError::SpawnFailed {
            command: request.command_display(),
            source: e,
        })?;

    let stdout = child.stdout.take().ok_or_else(|| InstallError::SpawnFailed {
        command: request.command_display(),
        source: std::io::Error::other("child stdout was not captured"),
    })?;

    for line in BufReader::new(stdout).lines() {
        let line = line?;
        sink.on_line(&line);
    }

    let status = child.wait()?;
    debug!(command = %request.command_display(), ?status, "child exited");
    Ok(RunOutcome::Completed { status })
}

#[cfg(unix)]
fn run_elevated(request: &LaunchRequest, sink: &mut dyn LineSink) -> Result<RunOutcome> {
    run_elevated_via(OsStr::new(ELEVATOR), request, sink)
}

/// Spawns the child through `elevator` and pumps the relay channel.
///
/// Split out from [`run_elevated`] so the elevator binary is a single
/// substitution point.
#[cfg(unix)]
fn run_elevated_via(
    elevator: &OsStr,
    request: &LaunchRequest,
    sink: &mut dyn LineSink,
) -> Result<RunOutcome> {
    use std::time::Instant;

    use crate::relay::ChannelId;
    use crate::relay::DEFAULT_CONNECT_TIMEOUT;
    use crate::relay::RelayListener;

    let id = ChannelId::generate();
    let listener = RelayListener::bind(&id)?;

    info!(
        command = %request.command_display(),
        elevator = %elevator.to_string_lossy(),
        channel = %id,
        "launching elevated"
    );
    let mut child = Command::new(elevator)
        .arg(&request.command)
        .args(&request.args)
        .arg(RELAY_FLAG)
        .arg(id.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| InstallError::SpawnFailed {
            command: elevator.to_string_lossy().into_owned(),
            source: e,
        })?;

    // Wait for the writer to connect, watching for the child exiting
    // first: a dismissed prompt ends the child before it ever connects.
    let deadline = Instant::now() + DEFAULT_CONNECT_TIMEOUT;
    let mut reader = loop {
        if let Some(reader) = listener.try_accept()? {
            break reader;
        }
        if let Some(status) = child.try_wait()? {
            return classify_elevated_exit(status);
        }
        if Instant::now() >= deadline {
            return Err(InstallError::RelayTimeout {
                channel: id.as_str().to_string(),
            });
        }
        std::thread::sleep(std::time::Duration::from_millis(25));
    };

    while let Some(line) = reader.next_line()? {
        sink.on_line(&line);
    }

    // Channel closed. The child may still be shutting down, or may have
    // exited before the last read returned; wait covers either order.
    let status = child.wait()?;
    classify_elevated_exit(status)
}

#[cfg(not(unix))]
fn run_elevated(_request: &LaunchRequest, _sink: &mut dyn LineSink) -> Result<RunOutcome> {
    Err(InstallError::RelayUnsupported)
}

/// Maps an elevated child's exit status onto an outcome.
///
/// pkexec reserves 126 for a dismissed authentication dialog and 127 for
/// denied authorization; anything else is the wrapped command's own status.
#[cfg(unix)]
fn classify_elevated_exit(status: ExitStatus) -> Result<RunOutcome> {
    match status.code() {
        Some(ELEVATION_DISMISSED) => {
            warn!("elevation prompt dismissed by user");
            Ok(RunOutcome::Cancelled)
        }
        Some(ELEVATION_DENIED) => Err(InstallError::SpawnFailed {
            command: ELEVATOR.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "authorization denied",
            ),
        }),
        _ => Ok(RunOutcome::Completed { status }),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use std::ffi::OsStr;

    #[derive(Default)]
    struct Collector(Vec<String>);

    impl LineSink for Collector {
        fn on_line(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_direct_forwards_lines_in_order() {
        let request = LaunchRequest::new("/bin/sh")
            .arg("-c")
            .arg("printf 'one\\ntwo\\nthree\\n'");
        let mut sink = Collector::default();

        let outcome =
            run(&request, ElevationMode::Direct, &mut sink).expect("launch should succeed");
        assert!(outcome.success());
        assert_eq!(sink.0, vec!["one", "two", "three"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_direct_reports_exit_status() {
        let request = LaunchRequest::new("/bin/sh").arg("-c").arg("exit 3");
        let mut sink = Collector::default();

        let outcome =
            run(&request, ElevationMode::Direct, &mut sink).expect("launch should succeed");
        match outcome {
            RunOutcome::Completed { status } => assert_eq!(status.code(), Some(3)),
            RunOutcome::Cancelled => panic!("direct run cannot be cancelled"),
        }
    }

    #[test]
    fn test_direct_missing_executable() {
        let request = LaunchRequest::new("/does/not/exist-mapdepot");
        let mut sink = NoopSink;

        let result = run(&request, ElevationMode::Direct, &mut sink);
        assert!(matches!(result, Err(InstallError::SpawnFailed { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_elevated_dismissal_is_cancelled_not_error() {
        // /usr/bin/env stands in for the elevator; the child exits with the
        // dismissal status before ever connecting the relay.
        let request = LaunchRequest::new("/bin/sh").arg("-c").arg("exit 126");
        let mut sink = Collector::default();

        let outcome = run_elevated_via(OsStr::new("/usr/bin/env"), &request, &mut sink)
            .expect("dismissal is not an error");
        assert!(matches!(outcome, RunOutcome::Cancelled));
        assert!(sink.0.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_elevated_child_exit_without_connecting() {
        let request = LaunchRequest::new("/bin/sh").arg("-c").arg("exit 0");
        let mut sink = Collector::default();

        let outcome = run_elevated_via(OsStr::new("/usr/bin/env"), &request, &mut sink)
            .expect("launch should succeed");
        assert!(outcome.success());
    }

    #[test]
    #[cfg(unix)]
    fn test_elevated_denied_is_error() {
        let request = LaunchRequest::new("/bin/sh").arg("-c").arg("exit 127");
        let mut sink = Collector::default();

        let result = run_elevated_via(OsStr::new("/usr/bin/env"), &request, &mut sink);
        assert!(matches!(result, Err(InstallError::SpawnFailed { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_elevated_relays_lines_from_connected_child() {
        use crate::relay::ChannelId;
        use crate::relay::RelayWriter;

        let temp = tempfile::TempDir::new().expect("temp dir");
        let handoff = temp.path().join("channel");

        // The stand-in child receives the --relay token appended by the
        // launcher ($0 is "--relay", $1 the token) and hands it back over
        // a file, since a shell cannot open the socket itself; a test
        // thread then plays the writer side like the real helper would.
        let script = format!("echo \"$1\" > '{}'; sleep 1", handoff.display());
        let request = LaunchRequest::new("/bin/sh").arg("-c").arg(script);

        let writer_thread = std::thread::spawn(move || {
            let mut token = String::new();
            for _ in 0..200 {
                if let Ok(contents) = std::fs::read_to_string(&handoff)
                    && contents.ends_with('\n')
                {
                    token = contents.trim().to_string();
                    break;
                }
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
            let id = ChannelId::parse(&token).expect("valid token");
            let mut writer = RelayWriter::connect(&id).expect("connect");
            writer.send_line("Status: Extracting maps/foo.yml").expect("send");
            writer.send_line("Status: Extracting maps/bar.yml").expect("send");
        });

        let mut sink = Collector::default();
        let outcome = run_elevated_via(OsStr::new("/usr/bin/env"), &request, &mut sink)
            .expect("launch should succeed");
        writer_thread.join().expect("writer thread");

        assert!(outcome.success());
        assert_eq!(
            sink.0,
            vec![
                "Status: Extracting maps/foo.yml",
                "Status: Extracting maps/bar.yml",
            ]
        );
    }
}
