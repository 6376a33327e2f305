//! Named relay channel for streaming child output to the parent process.
//!
//! The parent binds a listener on a freshly generated channel identifier and
//! hands the identifier to the child as a command-line argument. The child
//! connects the writer end and sends newline-delimited text; the parent
//! reads with blocking calls until the transport closes. The channel is
//! strictly one-directional and best-effort: there is no acknowledgment
//! path back to the child.
//!
//! Transport is a Unix domain socket under the runtime directory. On other
//! platforms every endpoint constructor reports `RelayUnsupported`.

use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::InstallError;
use crate::Result;

/// How long the parent waits for the child's writer end to connect.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for the writer to connect.
#[cfg(unix)]
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A process-wide-unique relay channel identifier.
///
/// The token is plain lowercase hex with a fixed prefix, so it is safe to
/// pass through an argument vector without quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelId(String);

impl ChannelId {
    /// Generates a fresh identifier.
    ///
    /// Identifiers never collide across concurrent installs; each launcher
    /// invocation generates its own.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("mapdepot{}", Uuid::new_v4().simple()))
    }

    /// Parses an identifier received from the parent process.
    ///
    /// # Errors
    ///
    /// Returns `RelayBroken` for tokens containing characters that could
    /// not have come from [`ChannelId::generate`].
    pub fn parse(token: &str) -> Result<Self> {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InstallError::RelayBroken {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("malformed channel token: {token:?}"),
                ),
            });
        }
        Ok(Self(token.to_string()))
    }

    /// Returns the identifier token.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the socket path this channel binds to.
    #[must_use]
    pub fn socket_path(&self) -> PathBuf {
        runtime_dir().join(format!("{}.sock", self.0))
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the directory relay sockets live in.
///
/// `XDG_RUNTIME_DIR` when set, the system temp directory otherwise.
fn runtime_dir() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map_or_else(std::env::temp_dir, PathBuf::from)
}

#[cfg(unix)]
mod unix_impl {
    use std::io::BufRead;
    use std::io::BufReader;
    use std::io::Write;
    use std::os::unix::net::UnixListener;
    use std::os::unix::net::UnixStream;
    use std::path::PathBuf;
    use std::time::Duration;
    use std::time::Instant;

    use tracing::debug;
    use tracing::warn;

    use super::ACCEPT_POLL_INTERVAL;
    use super::ChannelId;
    use crate::InstallError;
    use crate::Result;

    /// Parent-side endpoint: owns the bound socket until a writer connects.
    ///
    /// The socket file is unlinked when the listener drops; an established
    /// connection keeps working after the unlink.
    #[derive(Debug)]
    pub struct RelayListener {
        id: ChannelId,
        listener: UnixListener,
        path: PathBuf,
    }

    impl RelayListener {
        /// Binds the channel's socket, replacing any stale socket file left
        /// by a crashed earlier run.
        pub fn bind(id: &ChannelId) -> Result<Self> {
            let path = id.socket_path();
            if path.exists() {
                warn!(path = %path.display(), "removing stale relay socket");
                std::fs::remove_file(&path)?;
            }

            let listener = UnixListener::bind(&path)?;
            listener.set_nonblocking(true)?;
            debug!(channel = %id, path = %path.display(), "relay channel bound");

            Ok(Self {
                id: id.clone(),
                listener,
                path,
            })
        }

        /// Accepts the writer connection if one is pending.
        pub fn try_accept(&self) -> Result<Option<RelayReader>> {
            match self.listener.accept() {
                Ok((stream, _)) => {
                    stream.set_nonblocking(false)?;
                    debug!(channel = %self.id, "relay writer connected");
                    Ok(Some(RelayReader {
                        lines: BufReader::new(stream).lines(),
                    }))
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
                Err(e) => Err(InstallError::Io(e)),
            }
        }

        /// Blocks until the writer connects, bounded by `timeout`.
        ///
        /// # Errors
        ///
        /// Returns `RelayTimeout` if no writer connects within the window.
        pub fn accept(&self, timeout: Duration) -> Result<RelayReader> {
            let deadline = Instant::now() + timeout;
            loop {
                if let Some(reader) = self.try_accept()? {
                    return Ok(reader);
                }
                if Instant::now() >= deadline {
                    return Err(InstallError::RelayTimeout {
                        channel: self.id.as_str().to_string(),
                    });
                }
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }

        /// The channel this listener is bound to.
        #[must_use]
        pub fn channel(&self) -> &ChannelId {
            &self.id
        }
    }

    impl Drop for RelayListener {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    /// Parent-side line reader over an accepted connection.
    #[derive(Debug)]
    pub struct RelayReader {
        lines: std::io::Lines<BufReader<UnixStream>>,
    }

    impl RelayReader {
        /// Reads the next line, blocking until one arrives.
        ///
        /// Returns `Ok(None)` at end-of-stream, which signals that the
        /// writer closed the channel.
        ///
        /// # Errors
        ///
        /// Returns `RelayBroken` if the transport fails mid-stream.
        pub fn next_line(&mut self) -> Result<Option<String>> {
            match self.lines.next() {
                None => Ok(None),
                Some(Ok(line)) => Ok(Some(line)),
                Some(Err(e)) => Err(InstallError::RelayBroken { source: e }),
            }
        }
    }

    /// Child-side endpoint: connects to the parent's listener and writes
    /// one line at a time.
    #[derive(Debug)]
    pub struct RelayWriter {
        stream: UnixStream,
    }

    impl RelayWriter {
        /// Connects the writer end of the channel named by `id`.
        pub fn connect(id: &ChannelId) -> Result<Self> {
            let stream = UnixStream::connect(id.socket_path())
                .map_err(|e| InstallError::RelayBroken { source: e })?;
            Ok(Self { stream })
        }

        /// Sends one line. Delivery is best-effort; if the parent has gone
        /// away the error is reported but the child may simply stop writing.
        pub fn send_line(&mut self, line: &str) -> Result<()> {
            self.stream
                .write_all(line.as_bytes())
                .and_then(|()| self.stream.write_all(b"\n"))
                .map_err(|e| InstallError::RelayBroken { source: e })
        }
    }
}

#[cfg(unix)]
pub use unix_impl::RelayListener;
#[cfg(unix)]
pub use unix_impl::RelayReader;
#[cfg(unix)]
pub use unix_impl::RelayWriter;

#[cfg(not(unix))]
mod stub_impl {
    use std::time::Duration;

    use super::ChannelId;
    use crate::InstallError;
    use crate::Result;

    /// Parent-side endpoint. Unsupported on this platform.
    #[derive(Debug)]
    pub struct RelayListener {
        _private: (),
    }

    impl RelayListener {
        /// Always reports `RelayUnsupported` on this platform.
        pub fn bind(_id: &ChannelId) -> Result<Self> {
            Err(InstallError::RelayUnsupported)
        }

        /// Always reports `RelayUnsupported` on this platform.
        pub fn try_accept(&self) -> Result<Option<RelayReader>> {
            Err(InstallError::RelayUnsupported)
        }

        /// Always reports `RelayUnsupported` on this platform.
        pub fn accept(&self, _timeout: Duration) -> Result<RelayReader> {
            Err(InstallError::RelayUnsupported)
        }
    }

    /// Parent-side line reader. Unsupported on this platform.
    #[derive(Debug)]
    pub struct RelayReader {
        _private: (),
    }

    impl RelayReader {
        /// Always reports `RelayUnsupported` on this platform.
        pub fn next_line(&mut self) -> Result<Option<String>> {
            Err(InstallError::RelayUnsupported)
        }
    }

    /// Child-side endpoint. Unsupported on this platform.
    #[derive(Debug)]
    pub struct RelayWriter {
        _private: (),
    }

    impl RelayWriter {
        /// Always reports `RelayUnsupported` on this platform.
        pub fn connect(_id: &ChannelId) -> Result<Self> {
            Err(InstallError::RelayUnsupported)
        }

        /// Always reports `RelayUnsupported` on this platform.
        pub fn send_line(&mut self, _line: &str) -> Result<()> {
            Err(InstallError::RelayUnsupported)
        }
    }
}

#[cfg(not(unix))]
pub use stub_impl::RelayListener;
#[cfg(not(unix))]
pub use stub_impl::RelayReader;
#[cfg(not(unix))]
pub use stub_impl::RelayWriter;
