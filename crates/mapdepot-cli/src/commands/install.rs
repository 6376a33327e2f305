//! Install command implementation.

use crate::cli::Cli;
use crate::cli::InstallArgs;
use crate::error::add_package_context;
use crate::output::OutputFormatter;
use crate::sink;
use anyhow::Context;
use anyhow::Result;
use mapdepot_core::InstallRequest;
use mapdepot_core::Installer;

pub fn execute(args: &InstallArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let installer = match &args.helper {
        Some(helper) => Installer::new(helper),
        None => Installer::from_current_exe().context("failed to resolve own executable")?,
    };

    let mut sink = sink::select(cli.relay.as_deref(), cli.quiet, cli.json)?;
    let request = InstallRequest {
        source: args.package.clone(),
        dest_root: args.dest_root.clone(),
        mod_id: args.mod_id.clone(),
        elevation: args.elevation.into(),
    };

    // The CLI holds no package catalog, so the package-set-changed signal
    // has no receiver here; library consumers hook their reload into it.
    let outcome = add_package_context(
        installer.install(&request, sink.as_mut(), &mut || {}),
        &args.package,
    )?;

    formatter.format_install_result(&outcome)?;

    Ok(())
}
