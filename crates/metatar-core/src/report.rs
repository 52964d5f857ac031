//! Diagnostics, progress callbacks and operation reports.

use crate::types::NanoTime;
use crate::types::format_signed_seconds;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Why create left an object out of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Unix domain sockets cannot be recorded.
    Socket,
    /// The object is the manifest file being written.
    ManifestItself,
}

/// A single field that differs between a manifest entry and the live
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Owner uid differs.
    Uid {
        /// Recorded uid.
        recorded: u64,
        /// Live uid.
        live: u64,
    },
    /// Group gid differs.
    Gid {
        /// Recorded gid.
        recorded: u64,
        /// Live gid.
        live: u64,
    },
    /// Size of a regular file differs.
    Size {
        /// Recorded size.
        recorded: u64,
        /// Live size.
        live: u64,
    },
    /// Access time differs.
    Atime {
        /// Recorded time.
        recorded: NanoTime,
        /// Live time.
        live: NanoTime,
    },
    /// Modification time differs.
    Mtime {
        /// Recorded time.
        recorded: NanoTime,
        /// Live time.
        live: NanoTime,
    },
    /// Type+permission string differs.
    Mode {
        /// Recorded string, e.g. `-rw-r--r--`.
        recorded: String,
        /// Live string.
        live: String,
    },
    /// Symlink target differs, or the live object is no longer a symlink.
    LinkTarget {
        /// Recorded target.
        recorded: PathBuf,
        /// Live target, `None` if the live object is not a symlink.
        live: Option<PathBuf>,
    },
    /// Device numbers differ.
    Device {
        /// Recorded `(major, minor)`.
        recorded: (u32, u32),
        /// Live `(major, minor)`.
        live: (u32, u32),
    },
    /// Content digest differs. Neither digest is disclosed.
    Content,
}

impl Mismatch {
    /// Short field name, stable for machine-readable output.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Uid { .. } => "uid",
            Self::Gid { .. } => "gid",
            Self::Size { .. } => "size",
            Self::Atime { .. } => "atime",
            Self::Mtime { .. } => "mtime",
            Self::Mode { .. } => "mode",
            Self::LinkTarget { .. } => "link_target",
            Self::Device { .. } => "device",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uid { recorded, live } => write!(f, "uid differs ({recorded} != {live})"),
            Self::Gid { recorded, live } => write!(f, "gid differs ({recorded} != {live})"),
            Self::Size { recorded, live } => write!(f, "size differs ({recorded} != {live})"),
            Self::Atime { recorded, live } => write!(
                f,
                "atime differs: now {live} ({})",
                format_signed_seconds(live.nanos_since(*recorded))
            ),
            Self::Mtime { recorded, live } => write!(
                f,
                "mtime differs: now {live} ({})",
                format_signed_seconds(live.nanos_since(*recorded))
            ),
            Self::Mode { recorded, live } => write!(f, "mode differs ({recorded} != {live})"),
            Self::LinkTarget {
                recorded,
                live: Some(live),
            } => write!(
                f,
                "symlink differs ({} != {})",
                recorded.display(),
                live.display()
            ),
            Self::LinkTarget {
                recorded,
                live: None,
            } => write!(f, "symlink differs ({} != not a symlink)", recorded.display()),
            Self::Device { recorded, live } => write!(
                f,
                "device differs ({},{} != {},{})",
                recorded.0, recorded.1, live.0, live.1
            ),
            Self::Content => write!(f, "contents differ"),
        }
    }
}

/// A non-fatal condition surfaced during create, list or verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An object was left out of the manifest.
    Skipped {
        /// Walked path.
        path: PathBuf,
        /// Why it was left out.
        reason: SkipReason,
    },
    /// A recorded field differs from the live object.
    Mismatch {
        /// Entry path.
        path: PathBuf,
        /// The differing field.
        mismatch: Mismatch,
    },
    /// A manifest entry has no counterpart on the live filesystem.
    Missing {
        /// Entry path.
        path: PathBuf,
    },
    /// A requested name matched no manifest entry.
    NotFound {
        /// The name as requested.
        name: OsString,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped {
                path,
                reason: SkipReason::Socket,
            } => write!(f, "{}: socket ignored", path.display()),
            Self::Skipped {
                path,
                reason: SkipReason::ManifestItself,
            } => write!(f, "{}: file is the manifest; not recorded", path.display()),
            Self::Mismatch { path, mismatch } => write!(f, "{}: {mismatch}", path.display()),
            Self::Missing { path } => {
                write!(f, "{}: no such file or directory", path.display())
            }
            Self::NotFound { name } => {
                write!(f, "{}: not found in manifest", name.to_string_lossy())
            }
        }
    }
}

/// Receiver for diagnostics.
///
/// The CLI prints each one to stderr as it arrives; tests collect them.
/// `Vec<Diagnostic>` implements this trait by pushing.
///
/// # Examples
///
/// ```
/// use metatar_core::report::Diagnostic;
/// use metatar_core::report::DiagnosticSink;
///
/// let mut sink: Vec<Diagnostic> = Vec::new();
/// sink.emit(&Diagnostic::NotFound { name: "x".into() });
/// assert_eq!(sink.len(), 1);
/// ```
pub trait DiagnosticSink {
    /// Handles one diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Callback trait for progress during create.
///
/// The total number of entries is not known up front, since the tree is
/// walked in a single streaming pass.
pub trait ProgressCallback {
    /// Called before an entry is processed.
    fn on_entry(&mut self, path: &Path);

    /// Called as file content is read for hashing.
    fn on_bytes_hashed(&mut self, bytes: u64);

    /// Called once when the operation is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry(&mut self, _path: &Path) {}

    fn on_bytes_hashed(&mut self, _bytes: u64) {}

    fn on_complete(&mut self) {}
}

/// Report of a create operation.
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Regular files recorded.
    pub files: usize,
    /// Directories recorded.
    pub directories: usize,
    /// Symlinks recorded.
    pub symlinks: usize,
    /// Device files, FIFOs and unknown objects recorded.
    pub specials: usize,
    /// Objects skipped with a diagnostic.
    pub skipped: usize,
    /// Bytes of file content hashed.
    pub bytes_hashed: u64,
    /// Bytes of manifest written, including the end-of-archive marker.
    pub manifest_bytes: u64,
    /// Duration of the operation.
    pub duration: Duration,
}

impl CreationReport {
    /// Total entries written to the manifest.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.files + self.directories + self.symlinks + self.specials
    }
}

/// Report of a list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListReport {
    /// Entries yielded after filtering.
    pub entries_listed: usize,
    /// Requested names that matched nothing, sorted.
    pub not_found: Vec<OsString>,
}

impl ListReport {
    /// Returns `true` if every requested name was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.not_found.is_empty()
    }
}

/// Report of a verify operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Entries compared against the filesystem.
    pub entries_checked: usize,
    /// Entries with at least one mismatching field.
    pub entries_mismatched: usize,
    /// Total mismatching fields across all entries.
    pub mismatches: usize,
    /// Entries whose path no longer exists.
    pub missing: usize,
    /// Requested names that matched nothing, sorted.
    pub not_found: Vec<OsString>,
}

impl VerificationReport {
    /// Returns `true` if nothing differed and nothing was missing.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.mismatches == 0 && self.missing == 0
    }

    /// Returns `true` if every requested name was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.not_found.is_empty()
    }
}
