//! Placeholder-entry writer.

use crate::ManifestError;
use crate::Result;
use crate::codec::ExtendedFields;
use crate::config::CreateConfig;
use crate::creation::names::NameCache;
use crate::hasher::FileHasher;
use crate::io::CountingWriter;
use crate::manifest::ManifestEntry;
use crate::report::CreationReport;
use crate::report::Diagnostic;
use crate::report::DiagnosticSink;
use crate::report::ProgressCallback;
use crate::report::SkipReason;
use crate::stat::LiveKind;
use crate::stat::LiveMetadata;
use crate::stat::lstat;
use crate::types::EntryKind;
use std::fs::Metadata;
use std::io;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use tar::Builder;
use tar::Header;
use tar::HeaderMode;

/// Writes one zero-length tar entry per filesystem object.
///
/// Each entry is written as soon as it is appended; nothing about earlier
/// entries is retained besides the counters in the report.
///
/// # Examples
///
/// ```no_run
/// use metatar_core::CreateConfig;
/// use metatar_core::creation::ManifestWriter;
/// use metatar_core::report::NoopProgress;
/// use metatar_core::report::Diagnostic;
/// use std::path::Path;
///
/// let config = CreateConfig::default();
/// let mut writer = ManifestWriter::new(Vec::new(), &config);
/// let meta = std::fs::symlink_metadata("Cargo.toml")?;
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// writer.append(Path::new("Cargo.toml"), &meta, &mut diagnostics, &mut NoopProgress)?;
/// let (bytes, report) = writer.finish()?;
/// assert_eq!(report.files, 1);
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub struct ManifestWriter<W: Write> {
    builder: Builder<CountingWriter<W>>,
    hasher: FileHasher,
    names: NameCache,
    skip_identity: Option<(u64, u64)>,
    report: CreationReport,
}

impl<W: Write> ManifestWriter<W> {
    /// Creates a writer emitting tar data into `writer`.
    pub fn new(writer: W, config: &CreateConfig) -> Self {
        Self {
            builder: Builder::new(CountingWriter::new(writer)),
            hasher: FileHasher::with_options(config.chunk_size, config.use_noatime),
            names: NameCache::new(),
            skip_identity: config.skip_identity,
            report: CreationReport::default(),
        }
    }

    /// Records the object at `path`, whose `lstat` metadata is `meta`.
    ///
    /// Sockets and the configured skip identity are reported to `sink` and
    /// left out. Returns the entry written, if any.
    ///
    /// # Errors
    ///
    /// Any failure to read the object (hashing, reading a link) or to write
    /// the manifest is returned and should abort the whole create.
    pub fn append(
        &mut self,
        path: &Path,
        meta: &Metadata,
        sink: &mut dyn DiagnosticSink,
        progress: &mut dyn ProgressCallback,
    ) -> Result<Option<ManifestEntry>> {
        let mut live = LiveMetadata::from_metadata(meta);

        if live.kind == LiveKind::Socket {
            self.skip(path, SkipReason::Socket, sink);
            return Ok(None);
        }
        if self.skip_identity == Some((live.dev, live.ino)) {
            self.skip(path, SkipReason::ManifestItself, sink);
            return Ok(None);
        }

        let kind = match live.kind {
            LiveKind::Regular => {
                let digest = self
                    .hasher
                    .hash_file_with_progress(path, progress)
                    .map_err(|e| ManifestError::read(path, e))?;
                // a refused O_NOATIME leaves the read visible in atime
                live.atime = lstat(path).map_err(|e| ManifestError::read(path, e))?.atime;
                self.report.bytes_hashed += live.size;
                EntryKind::Regular { digest }
            }
            LiveKind::Directory => EntryKind::Directory,
            LiveKind::Symlink => {
                let target =
                    std::fs::read_link(path).map_err(|e| ManifestError::read(path, e))?;
                // readlink may have touched the link's atime
                live.atime = lstat(path).map_err(|e| ManifestError::read(path, e))?.atime;
                EntryKind::Symlink { target }
            }
            LiveKind::CharDevice => EntryKind::CharDevice {
                major: live.device.0,
                minor: live.device.1,
            },
            LiveKind::BlockDevice => EntryKind::BlockDevice {
                major: live.device.0,
                minor: live.device.1,
            },
            LiveKind::Fifo => EntryKind::Fifo,
            LiveKind::Socket | LiveKind::Unknown => EntryKind::Unknown,
        };

        let entry = ManifestEntry {
            path: path.to_path_buf(),
            kind,
            mode: live.mode,
            uid: live.uid,
            gid: live.gid,
            owner: self.names.user(live.uid),
            group: self.names.group(live.gid),
            size: live.size,
            atime: live.atime,
            mtime: live.mtime,
        };

        self.write_entry(&entry, meta)?;

        match entry.kind {
            EntryKind::Regular { .. } => self.report.files += 1,
            EntryKind::Directory => self.report.directories += 1,
            EntryKind::Symlink { .. } => self.report.symlinks += 1,
            _ => self.report.specials += 1,
        }
        tracing::debug!(path = %path.display(), kind = entry.kind.name(), "recorded");

        Ok(Some(entry))
    }

    /// Writes the end-of-archive marker and returns the inner writer with
    /// the final report.
    pub fn finish(self) -> Result<(W, CreationReport)> {
        let mut counting = self.builder.into_inner()?;
        counting.flush()?;
        let mut report = self.report;
        report.manifest_bytes = counting.total_bytes();
        Ok((counting.into_inner(), report))
    }

    fn skip(&mut self, path: &Path, reason: SkipReason, sink: &mut dyn DiagnosticSink) {
        tracing::debug!(path = %path.display(), ?reason, "skipped");
        self.report.skipped += 1;
        sink.emit(&Diagnostic::Skipped {
            path: path.to_path_buf(),
            reason,
        });
    }

    fn write_entry(&mut self, entry: &ManifestEntry, meta: &Metadata) -> io::Result<()> {
        let header = build_header(entry, meta)?;
        let records = pax_records(entry, &header);
        self.builder
            .append_pax_extensions(records.iter().map(|(k, v)| (*k, v.as_slice())))?;
        self.builder.append(&header, io::empty())
    }
}

/// Derives a ustar header the way tar does for `meta`, then turns it into a
/// placeholder: zero body length, exact permission bits, device numbers and
/// owner names, with a best-effort name for readers that ignore pax.
fn build_header(entry: &ManifestEntry, meta: &Metadata) -> io::Result<Header> {
    let mut header = Header::new_ustar();
    header.set_metadata_in_mode(meta, HeaderMode::Complete);
    header.set_size(0);
    header.set_mode(entry.mode);
    header.set_mtime(u64::try_from(entry.mtime.seconds()).unwrap_or(0));

    if let Some((major, minor)) = entry.kind.device() {
        header.set_device_major(major)?;
        header.set_device_minor(minor)?;
    }
    if let Some(owner) = &entry.owner {
        // a name too long for ustar goes out as a pax `uname` record
        let _ = header.set_username(owner);
    }
    if let Some(group) = &entry.group {
        let _ = header.set_groupname(group);
    }

    let name = entry.path.as_os_str().as_bytes();
    copy_truncated(&mut header.as_old_mut().name, strip_leading_slashes(name));
    if let Some(target) = entry.kind.link_target() {
        copy_truncated(
            &mut header.as_old_mut().linkname,
            target.as_os_str().as_bytes(),
        );
    }

    header.set_cksum();
    Ok(header)
}

/// Pax records for an entry: the full path (and link target), owner names
/// the ustar header could not hold, and the encoded extended fields.
fn pax_records(entry: &ManifestEntry, header: &Header) -> Vec<(&'static str, Vec<u8>)> {
    let mut records = vec![("path", entry.path.as_os_str().as_bytes().to_vec())];

    if let Some(target) = entry.kind.link_target() {
        records.push(("linkpath", target.as_os_str().as_bytes().to_vec()));
    }
    if let Some(owner) = &entry.owner
        && header.username().ok().flatten() != Some(owner.as_str())
    {
        records.push(("uname", owner.as_bytes().to_vec()));
    }
    if let Some(group) = &entry.group
        && header.groupname().ok().flatten() != Some(group.as_str())
    {
        records.push(("gname", group.as_bytes().to_vec()));
    }

    let fields = ExtendedFields {
        size: entry.size,
        digest: entry.kind.digest().map(str::to_string),
        atime: entry.atime,
        mtime: entry.mtime,
    };
    records.extend(
        fields
            .encode()
            .into_iter()
            .map(|(key, value)| (key, value.into_bytes())),
    );

    records
}

fn strip_leading_slashes(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b'/').unwrap_or(bytes.len());
    if start == bytes.len() { b"/" } else { &bytes[start..] }
}

fn copy_truncated(field: &mut [u8], value: &[u8]) {
    let n = value.len().min(field.len());
    field.fill(0);
    field[..n].copy_from_slice(&value[..n]);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::NoopProgress;
    use std::fs;
    use tempfile::TempDir;

    fn append_one(path: &Path) -> (Vec<u8>, CreationReport, Vec<Diagnostic>) {
        let config = CreateConfig::default();
        let mut writer = ManifestWriter::new(Vec::new(), &config);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let meta = fs::symlink_metadata(path).unwrap();
        writer
            .append(path, &meta, &mut diagnostics, &mut NoopProgress)
            .unwrap();
        let (bytes, report) = writer.finish().unwrap();
        (bytes, report, diagnostics)
    }

    #[test]
    fn test_regular_file_body_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        fs::write(&path, vec![7u8; 5000]).unwrap();

        let (bytes, report, diagnostics) = append_one(&path);
        assert!(diagnostics.is_empty());
        assert_eq!(report.files, 1);
        assert_eq!(report.bytes_hashed, 5000);

        let mut archive = tar::Archive::new(bytes.as_slice());
        let mut entries = archive.entries().unwrap();
        let entry = entries.next().unwrap().unwrap();
        assert_eq!(entry.header().size().unwrap(), 0);
        assert_eq!(entry.header().entry_type(), tar::EntryType::Regular);
        assert_eq!(&*entry.path_bytes(), path.as_os_str().as_bytes());
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_socket_skipped_with_diagnostic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sock");
        let _listener = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let (bytes, report, diagnostics) = append_one(&path);
        assert_eq!(report.entries(), 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Skipped {
                path,
                reason: SkipReason::Socket
            }]
        );

        let mut archive = tar::Archive::new(bytes.as_slice());
        assert_eq!(archive.entries().unwrap().count(), 0);
    }

    #[test]
    fn test_skip_identity() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.tar");
        fs::write(&path, b"").unwrap();
        let meta = fs::symlink_metadata(&path).unwrap();
        let live = LiveMetadata::from_metadata(&meta);

        let config = CreateConfig::default().with_skip_identity(Some((live.dev, live.ino)));
        let mut writer = ManifestWriter::new(Vec::new(), &config);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let written = writer
            .append(&path, &meta, &mut diagnostics, &mut NoopProgress)
            .unwrap();
        assert!(written.is_none());
        assert!(matches!(
            diagnostics[0],
            Diagnostic::Skipped {
                reason: SkipReason::ManifestItself,
                ..
            }
        ));
    }

    #[test]
    fn test_long_and_absolute_paths_survive() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("d".repeat(120));
        fs::create_dir(&dir).unwrap();
        let path = dir.join("f".repeat(120));
        fs::write(&path, b"x").unwrap();
        assert!(path.is_absolute());

        let (bytes, _, _) = append_one(&path);
        let mut archive = tar::Archive::new(bytes.as_slice());
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(&*entry.path_bytes(), path.as_os_str().as_bytes());
    }

    #[test]
    fn test_strip_leading_slashes() {
        assert_eq!(strip_leading_slashes(b"/a/b"), b"a/b");
        assert_eq!(strip_leading_slashes(b"//a"), b"a");
        assert_eq!(strip_leading_slashes(b"/"), b"/");
        assert_eq!(strip_leading_slashes(b"rel"), b"rel");
    }

    #[test]
    fn test_copy_truncated() {
        let mut field = [0xffu8; 4];
        copy_truncated(&mut field, b"abcdef");
        assert_eq!(&field, b"abcd");
        copy_truncated(&mut field, b"x");
        assert_eq!(&field, b"x\0\0\0");
    }

    #[test]
    fn test_file_vanishing_before_hash_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vanishing-file.txt");
        fs::write(&path, "soon gone").unwrap();
        let meta = fs::symlink_metadata(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let mut writer = ManifestWriter::new(Vec::new(), &CreateConfig::default());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let err = writer
            .append(&path, &meta, &mut diagnostics, &mut NoopProgress)
            .unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.to_string().contains("vanishing-file.txt"), "{err}");
    }

    #[test]
    fn test_regular_file_atime_taken_after_hashing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("read.txt");
        fs::write(&path, "content").unwrap();

        let (bytes, _, _) = append_one(&path);
        let mut reader = crate::inspection::ManifestReader::new(bytes.as_slice());
        let mut filter = crate::inspection::NameFilter::all();
        let entry = reader.entries(&mut filter).unwrap().next().unwrap().unwrap();
        assert_eq!(entry.atime, lstat(&path).unwrap().atime);
    }
}
