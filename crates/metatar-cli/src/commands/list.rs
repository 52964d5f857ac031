//! List command implementation

use super::Outcome;
use crate::cli::ListArgs;
use crate::error::add_manifest_context;
use crate::output::OutputFormatter;
use crate::progress::DiagnosticPrinter;
use anyhow::Context;
use anyhow::Result;
use metatar_core::NameFilter;
use metatar_core::io::Channel;
use metatar_core::list_manifest;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter, program: &str) -> Result<Outcome> {
    let channel = Channel::from_arg(args.file.as_deref());
    let source = channel
        .open_read()
        .with_context(|| format!("Cannot open manifest '{channel}'"))?;

    let mut filter = NameFilter::new(args.names.iter().cloned());
    let mut printer = DiagnosticPrinter::new(program);

    let report = add_manifest_context(
        list_manifest(source, &mut filter, &mut printer, |entry| {
            formatter.format_entry(entry)
        }),
        &channel,
    )?;

    formatter.format_list_result(&report)?;

    Ok(if report.is_complete() {
        Outcome::Success
    } else {
        Outcome::NotFound
    })
}
