//! Create operation: walk roots, write one entry per object.

use crate::Result;
use crate::config::CreateConfig;
use crate::creation::walker::walk;
use crate::creation::writer::ManifestWriter;
use crate::report::CreationReport;
use crate::report::DiagnosticSink;
use crate::report::ProgressCallback;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Writes a manifest of every object under `roots` to `writer`.
///
/// Roots are walked in the order given; each is recorded itself and then,
/// if it is a directory, everything below it. Skipped objects are reported
/// to `sink`.
///
/// # Errors
///
/// Returns an error, leaving a truncated manifest behind, if:
/// - a root does not exist ([`ManifestError::SourceNotFound`])
/// - any directory, metadata or file content cannot be read
/// - writing to `writer` fails
///
/// [`ManifestError::SourceNotFound`]: crate::ManifestError::SourceNotFound
///
/// # Examples
///
/// ```no_run
/// use metatar_core::CreateConfig;
/// use metatar_core::create_manifest;
/// use metatar_core::report::Diagnostic;
/// use metatar_core::report::NoopProgress;
///
/// let mut out = Vec::new();
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let report = create_manifest(
///     &mut out,
///     &["src"],
///     &CreateConfig::default(),
///     &mut diagnostics,
///     &mut NoopProgress,
/// )?;
/// println!("{} entries, {} bytes", report.entries(), report.manifest_bytes);
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub fn create_manifest<W: Write, P: AsRef<Path>>(
    writer: W,
    roots: &[P],
    config: &CreateConfig,
    sink: &mut dyn DiagnosticSink,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    let start = Instant::now();
    let mut manifest = ManifestWriter::new(writer, config);

    for root in roots {
        let root = root.as_ref();
        tracing::info!(root = %root.display(), "walking");
        for walked in walk(root) {
            let walked = walked?;
            progress.on_entry(&walked.path);
            manifest.append(&walked.path, &walked.metadata, sink, progress)?;
        }
    }

    let (_, mut report) = manifest.finish()?;
    report.duration = start.elapsed();
    progress.on_complete();

    tracing::info!(
        entries = report.entries(),
        skipped = report.skipped,
        bytes_hashed = report.bytes_hashed,
        "manifest created"
    );
    Ok(report)
}
