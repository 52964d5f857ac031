//! Manifest listing.

use crate::Result;
use crate::inspection::filter::NameFilter;
use crate::inspection::reader::ManifestReader;
use crate::manifest::ManifestEntry;
use crate::report::DiagnosticSink;
use crate::report::ListReport;
use chrono::Local;
use chrono::TimeZone;
use std::fmt::Display;
use std::io::Read;

/// Minimum width of the `owner/group` column.
pub const OWNER_WIDTH: usize = 17;
/// Minimum width of the size column.
pub const SIZE_WIDTH: usize = 10;

/// Lists every entry of the manifest read from `source` that `filter`
/// accepts, handing each to `visit` as it is decoded.
///
/// Names left in `filter` after the scan are reported to `sink` as not
/// found and returned in the report.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or an entry is
/// malformed, or the first error `visit` returns.
///
/// # Examples
///
/// ```no_run
/// use metatar_core::NameFilter;
/// use metatar_core::inspection::render_long;
/// use metatar_core::list_manifest;
/// use metatar_core::report::Diagnostic;
///
/// let file = std::fs::File::open("tree.mtar")?;
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let report = list_manifest(file, &mut NameFilter::all(), &mut diagnostics, |entry| {
///     println!("{}", render_long(entry));
///     Ok(())
/// })?;
/// assert!(report.is_complete());
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub fn list_manifest<R, F>(
    source: R,
    filter: &mut NameFilter,
    sink: &mut dyn DiagnosticSink,
    mut visit: F,
) -> Result<ListReport>
where
    R: Read,
    F: FnMut(&ManifestEntry) -> std::io::Result<()>,
{
    let mut reader = ManifestReader::new(source);
    let mut report = ListReport::default();

    for entry in reader.entries(filter)? {
        let entry = entry?;
        visit(&entry)?;
        report.entries_listed += 1;
    }

    report.not_found = filter.drain_unmatched(sink);
    tracing::info!(
        listed = report.entries_listed,
        not_found = report.not_found.len(),
        "manifest listed"
    );
    Ok(report)
}

/// Renders the bare display name.
#[must_use]
pub fn render_short(entry: &ManifestEntry) -> String {
    entry.display_name()
}

/// Renders a long listing line with the modification time in local time.
///
/// ```text
/// -rw-r--r-- alice/staff                5 2023-11-14 22:13 notes.txt
/// lrwxrwxrwx alice/staff                9 2023-11-14 22:13 latest -> notes.txt
/// crw-rw-rw- root/root                1,3 2023-11-14 22:13 dev/null
/// ```
#[must_use]
pub fn render_long(entry: &ManifestEntry) -> String {
    render_long_in(entry, &Local)
}

/// Like [`render_long`], rendering the time in `tz`.
#[must_use]
pub fn render_long_in<Tz>(entry: &ManifestEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let size = match entry.kind.device() {
        Some((major, minor)) => format!("{major},{minor}"),
        None => entry.size.to_string(),
    };
    let time = tz
        .timestamp_opt(entry.mtime.seconds(), entry.mtime.subsec_nanos())
        .single()
        .map_or_else(
            || entry.mtime.seconds().to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );

    let mut line = format!(
        "{} {:<owner_width$} {size:>size_width$} {time} {}",
        entry.mode_string(),
        entry.owner_group(),
        entry.display_name(),
        owner_width = OWNER_WIDTH,
        size_width = SIZE_WIDTH,
    );
    if let Some(target) = entry.kind.link_target() {
        line.push_str(" -> ");
        line.push_str(&target.to_string_lossy());
    }
    line
}
