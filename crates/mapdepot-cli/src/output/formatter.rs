//! Output formatter trait for CLI results.

use anyhow::Result;
use mapdepot_core::ExtractionManifest;
use mapdepot_core::InstallOutcome;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of an install operation
    fn format_install_result(&self, outcome: &InstallOutcome) -> Result<()>;

    /// Format the result of a bare extraction
    fn format_extract_result(&self, manifest: &ExtractionManifest) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Cancelled,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Cancelled,
            data: None,
        }
    }
}
