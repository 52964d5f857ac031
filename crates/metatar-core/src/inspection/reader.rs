//! Streaming manifest reader.

use crate::ManifestError;
use crate::Result;
use crate::codec::ExtendedFields;
use crate::inspection::filter::NameFilter;
use crate::manifest::ManifestEntry;
use crate::types::EntryKind;
use std::ffi::OsString;
use std::io::Read;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;
use std::path::PathBuf;

/// Reads manifest entries from any byte source, one at a time.
///
/// Nothing is buffered beyond the entry being decoded, and the source is
/// never seeked, so standard input works as well as a file.
///
/// # Examples
///
/// ```no_run
/// use metatar_core::ManifestReader;
/// use metatar_core::NameFilter;
///
/// let file = std::fs::File::open("tree.mtar")?;
/// let mut reader = ManifestReader::new(file);
/// let mut filter = NameFilter::all();
/// for entry in reader.entries(&mut filter)? {
///     let entry = entry?;
///     println!("{} {}", entry.mode_string(), entry.display_name());
/// }
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub struct ManifestReader<R: Read> {
    archive: tar::Archive<R>,
}

impl<R: Read> ManifestReader<R> {
    /// Wraps a manifest byte source.
    pub fn new(source: R) -> Self {
        Self {
            archive: tar::Archive::new(source),
        }
    }

    /// Iterates the entries accepted by `filter`, consuming matched names.
    ///
    /// The iterator ends after the first error.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidArchive`] if the container cannot be
    /// opened. Items are errors for container framing problems or
    /// [`ManifestError::MalformedEntry`] for undecodable entries.
    pub fn entries<'a>(&'a mut self, filter: &'a mut NameFilter) -> Result<Entries<'a, R>> {
        let inner = self
            .archive
            .entries()
            .map_err(|e| ManifestError::InvalidArchive(format!("failed to read entries: {e}")))?;
        Ok(Entries {
            inner,
            filter,
            failed: false,
        })
    }
}

/// Iterator over filtered manifest entries.
pub struct Entries<'a, R: Read> {
    inner: tar::Entries<'a, R>,
    filter: &'a mut NameFilter,
    failed: bool,
}

impl<R: Read> Iterator for Entries<'_, R> {
    type Item = Result<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let decoded = match self.inner.next()? {
                Ok(mut entry) => decode_entry(&mut entry),
                Err(e) => Err(ManifestError::InvalidArchive(format!(
                    "failed to read entry: {e}"
                ))),
            };
            match decoded {
                Ok(entry) if self.filter.matches(&entry) => return Some(Ok(entry)),
                Ok(entry) => {
                    tracing::trace!(path = %entry.path.display(), "filtered out");
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Decodes one container entry into a manifest entry.
fn decode_entry<R: Read>(entry: &mut tar::Entry<'_, R>) -> Result<ManifestEntry> {
    let path = PathBuf::from(OsString::from_vec(entry.path_bytes().into_owned()));

    let records = pax_records(entry, &path)?;
    let lookup = |key: &str| {
        records
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    };
    let fields = ExtendedFields::decode(
        &path,
        records.iter().map(|(k, v)| (k.as_str(), v.as_slice())),
    )?;

    let link_target = entry
        .link_name_bytes()
        .map(|bytes| PathBuf::from(OsString::from_vec(bytes.into_owned())));
    let header = entry.header();
    let bad_header = |what: &str, e: std::io::Error| {
        ManifestError::malformed(&path, format!("invalid {what} in header: {e}"))
    };

    let kind = match header.entry_type() {
        tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::Regular {
            digest: fields
                .digest
                .clone()
                .ok_or_else(|| ManifestError::malformed(&path, "regular file without digest"))?,
        },
        tar::EntryType::Directory => EntryKind::Directory,
        tar::EntryType::Symlink => EntryKind::Symlink {
            target: link_target
                .ok_or_else(|| ManifestError::malformed(&path, "symlink without target"))?,
        },
        tar::EntryType::Char | tar::EntryType::Block => {
            let major = header
                .device_major()
                .map_err(|e| bad_header("device major", e))?;
            let minor = header
                .device_minor()
                .map_err(|e| bad_header("device minor", e))?;
            let (Some(major), Some(minor)) = (major, minor) else {
                return Err(ManifestError::malformed(&path, "device without numbers"));
            };
            if header.entry_type() == tar::EntryType::Char {
                EntryKind::CharDevice { major, minor }
            } else {
                EntryKind::BlockDevice { major, minor }
            }
        }
        tar::EntryType::Fifo => EntryKind::Fifo,
        _ => EntryKind::Unknown,
    };

    if !kind.is_regular() && fields.digest.is_some() {
        return Err(ManifestError::malformed(
            &path,
            format!("{} entry carries a digest", kind.name()),
        ));
    }

    let uid = match lookup("uid") {
        Some(value) => parse_id(&path, "uid", value)?,
        None => header.uid().map_err(|e| bad_header("uid", e))?,
    };
    let gid = match lookup("gid") {
        Some(value) => parse_id(&path, "gid", value)?,
        None => header.gid().map_err(|e| bad_header("gid", e))?,
    };
    let owner = lookup("uname")
        .map(|v| String::from_utf8_lossy(v).into_owned())
        .or_else(|| header.username().ok().flatten().map(str::to_string))
        .filter(|name| !name.is_empty());
    let group = lookup("gname")
        .map(|v| String::from_utf8_lossy(v).into_owned())
        .or_else(|| header.groupname().ok().flatten().map(str::to_string))
        .filter(|name| !name.is_empty());
    let mode = header.mode().map_err(|e| bad_header("mode", e))? & 0o7777;

    Ok(ManifestEntry {
        path,
        kind,
        mode,
        uid,
        gid,
        owner,
        group,
        size: fields.size,
        atime: fields.atime,
        mtime: fields.mtime,
    })
}

/// Collects the entry's pax records into owned pairs. Records whose key is
/// not UTF-8 are ignored.
fn pax_records<R: Read>(entry: &mut tar::Entry<'_, R>, path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let Some(extensions) = entry
        .pax_extensions()
        .map_err(|e| ManifestError::malformed(path, format!("unreadable extended header: {e}")))?
    else {
        return Err(ManifestError::malformed(path, "no extended header"));
    };

    let mut records = Vec::new();
    for extension in extensions {
        let extension = extension
            .map_err(|e| ManifestError::malformed(path, format!("bad extended record: {e}")))?;
        if let Ok(key) = extension.key() {
            records.push((key.to_string(), extension.value_bytes().to_vec()));
        }
    }
    Ok(records)
}

fn parse_id(path: &Path, key: &str, value: &[u8]) -> Result<u64> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ManifestError::malformed(path, format!("invalid {key} record")))
}
