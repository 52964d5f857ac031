//! Output formatter trait for CLI results.

use anyhow::Result;
use metatar_core::ManifestEntry;
use metatar_core::io::Channel;
use metatar_core::report::CreationReport;
use metatar_core::report::ListReport;
use metatar_core::report::VerificationReport;
use serde::Serialize;
use std::io;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Writes one listed entry to stdout as soon as it is decoded.
    fn format_entry(&self, entry: &ManifestEntry) -> io::Result<()>;

    /// Format create summary. Always goes to stderr, since the manifest
    /// itself may be on stdout.
    fn format_creation_result(&self, manifest: &Channel, report: &CreationReport) -> Result<()>;

    /// Format list summary
    fn format_list_result(&self, report: &ListReport) -> Result<()>;

    /// Format verify summary
    fn format_verification_result(
        &self,
        manifest: &Channel,
        report: &VerificationReport,
    ) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Differences,
    Incomplete,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(operation: impl Into<String>, status: Status, data: T) -> Self {
        Self {
            operation: operation.into(),
            status,
            data,
        }
    }
}
