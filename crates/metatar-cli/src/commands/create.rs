//! Create command implementation

use super::Outcome;
use crate::cli::CreateArgs;
use crate::error::add_manifest_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::progress::DiagnosticPrinter;
use anyhow::Context;
use anyhow::Result;
use metatar_core::CreateConfig;
use metatar_core::create_manifest;
use metatar_core::io::Channel;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    program: &str,
    quiet: bool,
) -> Result<Outcome> {
    let channel = Channel::from_arg(args.file.as_deref());
    let (writer, identity) = channel
        .create_write()
        .with_context(|| format!("Cannot open manifest '{channel}' for writing"))?;

    let config = CreateConfig::default().with_skip_identity(identity);

    // the spinner would tear a manifest streamed to a terminal
    let mut progress = if !quiet && channel.path().is_some() && CliProgress::should_show() {
        CliProgress::spinner("Recording")
    } else {
        CliProgress::hidden()
    };
    let mut printer = DiagnosticPrinter::new(program).attached_to(&progress);

    let report = add_manifest_context(
        create_manifest(writer, &args.paths, &config, &mut printer, &mut progress),
        &channel,
    )?;
    drop(progress);

    formatter.format_creation_result(&channel, &report)?;
    Ok(Outcome::Success)
}
