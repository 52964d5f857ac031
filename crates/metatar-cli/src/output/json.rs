//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::Status;
use anyhow::Result;
use metatar_core::ManifestEntry;
use metatar_core::io::Channel;
use metatar_core::report::CreationReport;
use metatar_core::report::ListReport;
use metatar_core::report::VerificationReport;
use serde::Serialize;
use std::io;
use std::io::Write;

pub struct JsonFormatter;

/// One manifest entry as a single-line JSON object.
#[derive(Debug, Serialize)]
struct EntryOutput {
    path: String,
    kind: &'static str,
    mode: String,
    uid: u64,
    gid: u64,
    owner: Option<String>,
    group: Option<String>,
    size: u64,
    digest: Option<String>,
    atime: String,
    mtime: String,
    link_target: Option<String>,
    device: Option<DeviceOutput>,
}

#[derive(Debug, Serialize)]
struct DeviceOutput {
    major: u32,
    minor: u32,
}

impl From<&ManifestEntry> for EntryOutput {
    fn from(entry: &ManifestEntry) -> Self {
        Self {
            path: entry.display_name(),
            kind: entry.kind.name(),
            mode: entry.mode_string(),
            uid: entry.uid,
            gid: entry.gid,
            owner: entry.owner.clone(),
            group: entry.group.clone(),
            size: entry.size,
            digest: entry.kind.digest().map(str::to_string),
            atime: entry.atime.to_string(),
            mtime: entry.mtime.to_string(),
            link_target: entry
                .kind
                .link_target()
                .map(|target| target.to_string_lossy().into_owned()),
            device: entry
                .kind
                .device()
                .map(|(major, minor)| DeviceOutput { major, minor }),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(out, "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_entry(&self, entry: &ManifestEntry) -> io::Result<()> {
        let json = serde_json::to_string(&EntryOutput::from(entry))?;
        writeln!(io::stdout().lock(), "{json}")
    }

    fn format_creation_result(&self, manifest: &Channel, report: &CreationReport) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput {
            manifest: String,
            files: usize,
            directories: usize,
            symlinks: usize,
            specials: usize,
            skipped: usize,
            bytes_hashed: u64,
            manifest_bytes: u64,
            duration_ms: u128,
        }

        let data = CreationOutput {
            manifest: manifest.to_string(),
            files: report.files,
            directories: report.directories,
            symlinks: report.symlinks,
            specials: report.specials,
            skipped: report.skipped,
            bytes_hashed: report.bytes_hashed,
            manifest_bytes: report.manifest_bytes,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(
            &JsonOutput::new("create", Status::Success, data),
            &mut io::stderr(),
        )
    }

    fn format_list_result(&self, _report: &ListReport) -> Result<()> {
        // entries were already streamed, one object per line
        Ok(())
    }

    fn format_verification_result(
        &self,
        manifest: &Channel,
        report: &VerificationReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct VerificationOutput {
            manifest: String,
            entries_checked: usize,
            entries_mismatched: usize,
            mismatches: usize,
            missing: usize,
            not_found: Vec<String>,
        }

        let status = if !report.is_complete() {
            Status::Incomplete
        } else if report.is_clean() {
            Status::Success
        } else {
            Status::Differences
        };
        let data = VerificationOutput {
            manifest: manifest.to_string(),
            entries_checked: report.entries_checked,
            entries_mismatched: report.entries_mismatched,
            mismatches: report.mismatches,
            missing: report.missing,
            not_found: report
                .not_found
                .iter()
                .map(|name| name.to_string_lossy().into_owned())
                .collect(),
        };

        Self::output(&JsonOutput::new("verify", status, data), &mut io::stdout())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use metatar_core::EntryKind;
    use metatar_core::NanoTime;
    use std::path::PathBuf;

    fn entry(kind: EntryKind) -> ManifestEntry {
        ManifestEntry {
            path: PathBuf::from("dev/null"),
            kind,
            mode: 0o666,
            uid: 0,
            gid: 0,
            owner: Some("root".into()),
            group: None,
            size: 0,
            atime: NanoTime::from_parts(1, 5),
            mtime: NanoTime::from_parts(2, 0),
        }
    }

    #[test]
    fn test_device_entry_fields() {
        let value =
            serde_json::to_value(EntryOutput::from(&entry(EntryKind::CharDevice {
                major: 1,
                minor: 3,
            })))
            .unwrap();
        assert_eq!(value["kind"], "char-device");
        assert_eq!(value["mode"], "crw-rw-rw-");
        assert_eq!(value["device"]["major"], 1);
        assert_eq!(value["device"]["minor"], 3);
        assert_eq!(value["atime"], "1.000000005");
        assert!(value["digest"].is_null());
        assert!(value["group"].is_null());
    }

    #[test]
    fn test_regular_entry_has_digest() {
        let value = serde_json::to_value(EntryOutput::from(&entry(EntryKind::Regular {
            digest: "ab".repeat(32),
        })))
        .unwrap();
        assert_eq!(value["kind"], "regular");
        assert_eq!(value["digest"], "ab".repeat(32));
        assert!(value["device"].is_null());
    }
}
