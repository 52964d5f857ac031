//! Manifest verification against the live filesystem.

use crate::ManifestError;
use crate::Result;
use crate::config::VerifyConfig;
use crate::hasher::FileHasher;
use crate::inspection::filter::NameFilter;
use crate::inspection::reader::ManifestReader;
use crate::manifest::ManifestEntry;
use crate::report::Diagnostic;
use crate::report::DiagnosticSink;
use crate::report::Mismatch;
use crate::report::VerificationReport;
use crate::stat::LiveKind;
use crate::stat::LiveMetadata;
use crate::stat::lstat;
use std::io;
use std::io::Read;

/// Result of checking one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// The path no longer exists.
    Missing,
    /// The path exists; every field that differs is listed, in check order.
    Checked(Vec<Mismatch>),
}

/// Compares manifest entries with the live objects at their paths.
pub struct Verifier {
    hasher: FileHasher,
    config: VerifyConfig,
}

impl Verifier {
    /// Creates a verifier.
    #[must_use]
    pub fn new(config: &VerifyConfig) -> Self {
        Self {
            hasher: FileHasher::with_options(config.chunk_size, true),
            config: config.clone(),
        }
    }

    /// Checks one entry. Symlinks at the entry's path are not followed.
    ///
    /// Fields are compared independently: uid, gid, size (regular files),
    /// atime, mtime, mode string, link target (symlinks), device numbers
    /// (device files) and content (regular files).
    ///
    /// # Errors
    ///
    /// Returns an error for any failure to inspect the live object other
    /// than its absence.
    pub fn check(&mut self, entry: &ManifestEntry) -> Result<EntryStatus> {
        let live = match lstat(&entry.path) {
            Ok(live) => live,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EntryStatus::Missing),
            Err(e) => return Err(ManifestError::read(&entry.path, e)),
        };

        let mut mismatches = Vec::new();

        if entry.uid != live.uid {
            mismatches.push(Mismatch::Uid {
                recorded: entry.uid,
                live: live.uid,
            });
        }
        if entry.gid != live.gid {
            mismatches.push(Mismatch::Gid {
                recorded: entry.gid,
                live: live.gid,
            });
        }
        if entry.kind.is_regular() && entry.size != live.size {
            mismatches.push(Mismatch::Size {
                recorded: entry.size,
                live: live.size,
            });
        }
        if self.config.check_atime && entry.atime != live.atime {
            mismatches.push(Mismatch::Atime {
                recorded: entry.atime,
                live: live.atime,
            });
        }
        if entry.mtime != live.mtime {
            mismatches.push(Mismatch::Mtime {
                recorded: entry.mtime,
                live: live.mtime,
            });
        }

        let recorded_mode = entry.mode_string();
        let live_mode = live.mode_string();
        if recorded_mode != live_mode {
            mismatches.push(Mismatch::Mode {
                recorded: recorded_mode,
                live: live_mode,
            });
        }

        if let Some(recorded) = entry.kind.link_target() {
            let live_target = if live.kind == LiveKind::Symlink {
                let target = std::fs::read_link(&entry.path)
                    .map_err(|e| ManifestError::read(&entry.path, e))?;
                Some(target)
            } else {
                None
            };
            if live_target.as_deref() != Some(recorded) {
                mismatches.push(Mismatch::LinkTarget {
                    recorded: recorded.to_path_buf(),
                    live: live_target,
                });
            }
        }

        if let Some(recorded) = entry.kind.device()
            && recorded != live.device
        {
            mismatches.push(Mismatch::Device {
                recorded,
                live: live.device,
            });
        }

        if let Some(recorded) = entry.kind.digest()
            && self.config.check_content
            && !self.content_matches(entry, &live, recorded)?
        {
            mismatches.push(Mismatch::Content);
        }

        Ok(EntryStatus::Checked(mismatches))
    }

    fn content_matches(
        &mut self,
        entry: &ManifestEntry,
        live: &LiveMetadata,
        recorded: &str,
    ) -> Result<bool> {
        if live.kind != LiveKind::Regular {
            return Ok(false);
        }
        let digest = self
            .hasher
            .hash_file(&entry.path)
            .map_err(|e| ManifestError::read(&entry.path, e))?;
        Ok(digest == recorded)
    }
}

/// Verifies every entry `filter` accepts from the manifest read from
/// `source`, reporting each mismatch, missing path and unmatched name to
/// `sink` as it is found.
///
/// Verification does not stop at the first difference; the whole manifest
/// is processed. Objects on disk that the manifest does not mention are not
/// looked for.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, an entry is malformed,
/// or a live object exists but cannot be inspected.
///
/// # Examples
///
/// ```no_run
/// use metatar_core::NameFilter;
/// use metatar_core::VerifyConfig;
/// use metatar_core::report::Diagnostic;
/// use metatar_core::verify_manifest;
///
/// let file = std::fs::File::open("tree.mtar")?;
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let report = verify_manifest(
///     file,
///     &mut NameFilter::all(),
///     &VerifyConfig::default(),
///     &mut diagnostics,
/// )?;
/// if !report.is_clean() {
///     for d in &diagnostics {
///         eprintln!("{d}");
///     }
/// }
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub fn verify_manifest<R: Read>(
    source: R,
    filter: &mut NameFilter,
    config: &VerifyConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<VerificationReport> {
    let mut reader = ManifestReader::new(source);
    let mut verifier = Verifier::new(config);
    let mut report = VerificationReport::default();

    for entry in reader.entries(filter)? {
        let entry = entry?;
        report.entries_checked += 1;

        match verifier.check(&entry)? {
            EntryStatus::Missing => {
                tracing::debug!(path = %entry.path.display(), "missing");
                report.missing += 1;
                sink.emit(&Diagnostic::Missing { path: entry.path });
            }
            EntryStatus::Checked(mismatches) => {
                tracing::debug!(
                    path = %entry.path.display(),
                    mismatches = mismatches.len(),
                    "verified"
                );
                if !mismatches.is_empty() {
                    report.entries_mismatched += 1;
                    report.mismatches += mismatches.len();
                }
                for mismatch in mismatches {
                    sink.emit(&Diagnostic::Mismatch {
                        path: entry.path.clone(),
                        mismatch,
                    });
                }
            }
        }
    }

    report.not_found = filter.drain_unmatched(sink);
    tracing::info!(
        checked = report.entries_checked,
        mismatched = report.entries_mismatched,
        missing = report.missing,
        not_found = report.not_found.len(),
        "manifest verified"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample;
    use crate::types::EntryKind;
    use crate::types::NanoTime;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn live_entry(path: &Path, kind: EntryKind) -> ManifestEntry {
        let live = lstat(path).unwrap();
        let mut entry = sample("x", kind);
        entry.path = path.to_path_buf();
        entry.mode = live.mode;
        entry.uid = live.uid;
        entry.gid = live.gid;
        entry.size = live.size;
        entry.atime = live.atime;
        entry.mtime = live.mtime;
        entry
    }

    fn regular(path: &Path) -> ManifestEntry {
        let digest = FileHasher::new().hash_file(path).unwrap();
        live_entry(path, EntryKind::Regular { digest })
    }

    fn mismatches(entry: &ManifestEntry) -> Vec<Mismatch> {
        match Verifier::new(&VerifyConfig::default()).check(entry).unwrap() {
            EntryStatus::Checked(m) => m,
            EntryStatus::Missing => panic!("unexpectedly missing"),
        }
    }

    #[test]
    fn test_unchanged_file_is_clean() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, "content").unwrap();
        let entry = regular(&path);
        assert!(mismatches(&entry).is_empty());
    }

    #[test]
    fn test_each_field_reported_independently() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, "content").unwrap();
        let mut entry = regular(&path);
        entry.uid += 1;
        entry.size += 1;
        entry.mtime = NanoTime::from_nanos(entry.mtime.as_nanos() - 1);

        let fields: Vec<_> = mismatches(&entry).iter().map(Mismatch::field).collect();
        assert_eq!(fields, vec!["uid", "size", "mtime"]);
    }

    #[test]
    fn test_missing_path() {
        let temp = TempDir::new().unwrap();
        let mut entry = sample("x", EntryKind::Fifo);
        entry.path = temp.path().join("gone");
        let status = Verifier::new(&VerifyConfig::default())
            .check(&entry)
            .unwrap();
        assert_eq!(status, EntryStatus::Missing);
    }

    #[test]
    fn test_file_replaced_by_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, "content").unwrap();
        let entry = regular(&path);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let found = mismatches(&entry);
        assert!(found.iter().any(|m| matches!(m, Mismatch::Mode { .. })));
        assert_eq!(found.last(), Some(&Mismatch::Content));
    }

    #[test]
    fn test_symlink_target_changed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("l");
        std::os::unix::fs::symlink("old", &path).unwrap();
        let entry = live_entry(
            &path,
            EntryKind::Symlink {
                target: "old".into(),
            },
        );
        fs::remove_file(&path).unwrap();
        std::os::unix::fs::symlink("new", &path).unwrap();

        let config = VerifyConfig::default().with_check_atime(false);
        let EntryStatus::Checked(found) = Verifier::new(&config).check(&entry).unwrap() else {
            panic!("missing");
        };
        assert!(found.contains(&Mismatch::LinkTarget {
            recorded: "old".into(),
            live: Some("new".into()),
        }));
    }

    #[test]
    fn test_content_check_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, "content").unwrap();
        let mut entry = regular(&path);
        entry.kind = EntryKind::Regular {
            digest: "00".repeat(32),
        };

        assert_eq!(mismatches(&entry), vec![Mismatch::Content]);
        let config = VerifyConfig::default().with_check_content(false);
        let status = Verifier::new(&config).check(&entry).unwrap();
        assert_eq!(status, EntryStatus::Checked(Vec::new()));
    }

    #[test]
    fn test_atime_check_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, "content").unwrap();
        let mut entry = regular(&path);
        entry.atime = NanoTime::from_parts(0, 0);

        assert_eq!(mismatches(&entry).len(), 1);
        let config = VerifyConfig::default().with_check_atime(false);
        let status = Verifier::new(&config).check(&entry).unwrap();
        assert_eq!(status, EntryStatus::Checked(Vec::new()));
    }

    #[test]
    fn test_unreadable_live_path_error_names_entry() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("plain");
        fs::write(&plain, "x").unwrap();
        let mut entry = sample("x", EntryKind::Directory);
        entry.path = plain.join("child");

        let err = Verifier::new(&VerifyConfig::default())
            .check(&entry)
            .unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }), "{err:?}");
        assert!(err.to_string().contains("plain/child"), "{err}");
    }
}
