//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use mapdepot_core::ExtractionManifest;
use mapdepot_core::InstallOutcome;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct InstallData<'a> {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<&'a ExtractionManifest>,
}

impl OutputFormatter for JsonFormatter {
    fn format_install_result(&self, outcome: &InstallOutcome) -> Result<()> {
        let output = match outcome {
            InstallOutcome::Installed(manifest) => JsonOutput::success(
                "install",
                InstallData {
                    outcome: "installed",
                    manifest: Some(manifest),
                },
            ),
            InstallOutcome::Delegated => JsonOutput::success(
                "install",
                InstallData {
                    outcome: "delegated",
                    manifest: None,
                },
            ),
            InstallOutcome::Cancelled => JsonOutput::cancelled("install"),
        };
        Self::output(&output)
    }

    fn format_extract_result(&self, manifest: &ExtractionManifest) -> Result<()> {
        let output = JsonOutput::success("extract", manifest);
        Self::output(&output)
    }
}
