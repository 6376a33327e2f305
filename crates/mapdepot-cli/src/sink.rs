//! Selection of the status line sink.
//!
//! A normal run prints status lines to standard output. When this process
//! is the elevated helper (`--relay` was passed by the parent), the lines
//! go over the relay channel instead, and the parent displays them.

use anyhow::Context;
use anyhow::Result;
use mapdepot_core::ChannelId;
use mapdepot_core::LineSink;
use mapdepot_core::NoopSink;
use mapdepot_core::RelayWriter;

/// Prints each line to standard output.
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn on_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Sends each line over the relay channel, best-effort.
///
/// Lines written after the parent stops reading are dropped; progress
/// display is the channel's only purpose.
pub struct RelaySink {
    writer: RelayWriter,
}

impl LineSink for RelaySink {
    fn on_line(&mut self, line: &str) {
        let _ = self.writer.send_line(line);
    }
}

/// Builds the sink for this invocation.
///
/// Relay takes precedence; otherwise lines are printed unless suppressed
/// (`--quiet`, or `--json` where they would corrupt the output document).
pub fn select(relay: Option<&str>, quiet: bool, json: bool) -> Result<Box<dyn LineSink>> {
    if let Some(token) = relay {
        let id = ChannelId::parse(token).context("invalid --relay channel token")?;
        let writer = RelayWriter::connect(&id)
            .with_context(|| format!("failed to connect relay channel {token}"))?;
        return Ok(Box::new(RelaySink { writer }));
    }

    if quiet || json {
        Ok(Box::new(NoopSink))
    } else {
        Ok(Box::new(StdoutSink))
    }
}
