//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use metatar_core::ManifestEntry;
use metatar_core::inspection::render_long;
use metatar_core::inspection::render_short;
use metatar_core::io::Channel;
use metatar_core::report::CreationReport;
use metatar_core::report::ListReport;
use metatar_core::report::VerificationReport;
use std::io;
use std::io::Write;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    stdout: Term,
    stderr: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// Summaries are only printed with `--verbose`.
    const fn show_summary(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn headline(&self, ok: bool, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        if ok {
            format!("{} {text}", style("✓").green().bold())
        } else {
            format!("{} {text}", style("✗").red().bold())
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_entry(&self, entry: &ManifestEntry) -> io::Result<()> {
        let line = if self.verbose {
            render_long(entry)
        } else {
            render_short(entry)
        };
        writeln!(io::stdout().lock(), "{line}")
    }

    fn format_creation_result(&self, manifest: &Channel, report: &CreationReport) -> Result<()> {
        if !self.show_summary() {
            return Ok(());
        }

        let term = &self.stderr;
        term.write_line(&self.headline(true, &format!("Manifest created: {manifest}")))?;
        term.write_line(&format!("  Files:            {}", report.files))?;
        term.write_line(&format!("  Directories:      {}", report.directories))?;
        term.write_line(&format!("  Symlinks:         {}", report.symlinks))?;
        if report.specials > 0 {
            term.write_line(&format!("  Special files:    {}", report.specials))?;
        }
        if report.skipped > 0 {
            term.write_line(&format!("  Skipped:          {}", report.skipped))?;
        }
        term.write_line(&format!(
            "  Content hashed:   {}",
            humanize_bytes(report.bytes_hashed)
        ))?;
        term.write_line(&format!(
            "  Manifest size:    {}",
            humanize_bytes(report.manifest_bytes)
        ))?;
        term.write_line(&format!("  Duration:         {:?}", report.duration))?;
        Ok(())
    }

    fn format_list_result(&self, report: &ListReport) -> Result<()> {
        if !self.show_summary() {
            return Ok(());
        }
        self.stderr
            .write_line(&format!("{} entries listed", report.entries_listed))?;
        Ok(())
    }

    fn format_verification_result(
        &self,
        manifest: &Channel,
        report: &VerificationReport,
    ) -> Result<()> {
        if !self.show_summary() {
            return Ok(());
        }

        let term = &self.stdout;
        let clean = report.is_clean() && report.is_complete();
        let headline = if clean {
            format!("Manifest verified: {manifest}")
        } else {
            format!("Differences found: {manifest}")
        };
        term.write_line(&self.headline(clean, &headline))?;
        term.write_line(&format!("  Entries checked:  {}", report.entries_checked))?;
        term.write_line(&format!(
            "  Entries differing: {}",
            report.entries_mismatched
        ))?;
        term.write_line(&format!("  Mismatches:       {}", report.mismatches))?;
        term.write_line(&format!("  Missing:          {}", report.missing))?;
        if !report.is_complete() {
            term.write_line(&format!("  Not found:        {}", report.not_found.len()))?;
        }
        Ok(())
    }
}
