//! Verify command implementation

use super::Outcome;
use crate::cli::VerifyArgs;
use crate::error::add_manifest_context;
use crate::output::OutputFormatter;
use crate::progress::DiagnosticPrinter;
use anyhow::Context;
use anyhow::Result;
use metatar_core::NameFilter;
use metatar_core::VerifyConfig;
use metatar_core::io::Channel;
use metatar_core::verify_manifest;

pub fn execute(
    args: &VerifyArgs,
    formatter: &dyn OutputFormatter,
    program: &str,
) -> Result<Outcome> {
    let channel = Channel::from_arg(args.file.as_deref());
    let source = channel
        .open_read()
        .with_context(|| format!("Cannot open manifest '{channel}'"))?;

    let config = VerifyConfig::default()
        .with_check_atime(!args.ignore_atime)
        .with_check_content(!args.no_content);
    let mut filter = NameFilter::new(args.names.iter().cloned());
    let mut printer = DiagnosticPrinter::new(program);

    let report = add_manifest_context(
        verify_manifest(source, &mut filter, &config, &mut printer),
        &channel,
    )?;

    formatter.format_verification_result(&channel, &report)?;

    // not-found names take precedence over differences
    Ok(if !report.is_complete() {
        Outcome::NotFound
    } else if !report.is_clean() {
        Outcome::Differences
    } else {
        Outcome::Success
    })
}
