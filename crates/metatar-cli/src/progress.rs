//! Diagnostic printing and progress display for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use metatar_core::report::Diagnostic;
use metatar_core::report::DiagnosticSink;
use metatar_core::report::ProgressCallback;
use std::path::Path;
use std::time::Duration;

/// Prints diagnostics to stderr as `program: message`.
///
/// When attached to a spinner, the spinner is suspended while each line is
/// written so the two never interleave.
pub struct DiagnosticPrinter {
    program: String,
    bar: Option<ProgressBar>,
}

impl DiagnosticPrinter {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            bar: None,
        }
    }

    /// Routes output around `progress`'s spinner, if it has one.
    #[must_use]
    pub fn attached_to(mut self, progress: &CliProgress) -> Self {
        self.bar.clone_from(&progress.bar);
        self
    }

    /// Formats one diagnostic line.
    #[must_use]
    pub fn line(&self, diagnostic: &Diagnostic) -> String {
        format!("{}: {diagnostic}", self.program)
    }
}

impl DiagnosticSink for DiagnosticPrinter {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let line = self.line(diagnostic);
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }
}

/// Spinner showing entries recorded and bytes hashed during create.
pub struct CliProgress {
    bar: Option<ProgressBar>,
    entries: u64,
    bytes_hashed: u64,
}

impl CliProgress {
    /// Creates a tracker that displays nothing.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            bar: None,
            entries: 0,
            bytes_hashed: 0,
        }
    }

    /// Creates a tracker with a spinner labelled `message`.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar: Some(bar),
            entries: 0,
            bytes_hashed: 0,
        }
    }

    /// Checks if a spinner can be shown (stderr is a TTY).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn refresh(&self) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!(
                "{} entries, {} hashed",
                self.entries,
                humanize_bytes(self.bytes_hashed)
            ));
        }
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry(&mut self, _path: &Path) {
        self.entries += 1;
        self.refresh();
    }

    fn on_bytes_hashed(&mut self, bytes: u64) {
        self.bytes_hashed += bytes;
        self.refresh();
    }

    fn on_complete(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
#[allow(clippy::cast_precision_loss)]
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
