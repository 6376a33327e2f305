//! Extract command implementation.
//!
//! Bare extraction without the install bookkeeping. This is also the body
//! the elevated helper runs when only unpacking is needed.

use crate::cli::Cli;
use crate::cli::ExtractArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use crate::sink;
use anyhow::Context;
use anyhow::Result;
use mapdepot_core::ExtractObserver;
use mapdepot_core::LineSink;
use mapdepot_core::extract_package_with_observer;
use mapdepot_core::install::status_line;
use std::env;
use std::path::Path;

pub fn execute(args: &ExtractArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut sink = sink::select(cli.relay.as_deref(), cli.quiet, cli.json)?;
    let mut observer = StatusObserver {
        sink: sink.as_mut(),
    };

    let manifest = add_package_context(
        extract_package_with_observer(&args.archive, &output_dir, &mut observer),
        &args.archive,
    )?;

    formatter.format_extract_result(&manifest)?;

    Ok(())
}

struct StatusObserver<'a> {
    sink: &'a mut dyn LineSink,
}

impl ExtractObserver for StatusObserver<'_> {
    fn on_entry(&mut self, name: &Path) {
        self.sink.on_line(&status_line(name));
    }
}
