//! Link-aware metadata of live filesystem objects.

use crate::types::NanoTime;
use crate::types::mode_string;
use std::fs::Metadata;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// File type of a live filesystem object.
///
/// Unlike [`EntryKind`](crate::types::EntryKind) this includes sockets,
/// which exist on disk but cannot be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// Anything else.
    Unknown,
}

impl LiveKind {
    /// Classifies a `std::fs::FileType`.
    #[must_use]
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::Regular
        } else if ft.is_char_device() {
            Self::CharDevice
        } else if ft.is_block_device() {
            Self::BlockDevice
        } else if ft.is_fifo() {
            Self::Fifo
        } else if ft.is_socket() {
            Self::Socket
        } else {
            Self::Unknown
        }
    }

    /// The leading character of an `ls -l` style mode string.
    #[must_use]
    pub const fn type_char(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::CharDevice => 'c',
            Self::BlockDevice => 'b',
            Self::Fifo => 'p',
            Self::Socket => 's',
            Self::Unknown => '?',
        }
    }
}

/// The subset of `lstat` results a manifest records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMetadata {
    /// Object type.
    pub kind: LiveKind,
    /// Permission bits (`0o7777`).
    pub mode: u32,
    /// Owner user id.
    pub uid: u64,
    /// Owner group id.
    pub gid: u64,
    /// Size in bytes as reported by `stat`.
    pub size: u64,
    /// Last access time.
    pub atime: NanoTime,
    /// Last modification time.
    pub mtime: NanoTime,
    /// Device `(major, minor)` for device files, `(0, 0)` otherwise.
    pub device: (u32, u32),
    /// Filesystem device id, for identity checks.
    pub dev: u64,
    /// Inode number, for identity checks.
    pub ino: u64,
}

impl LiveMetadata {
    /// Extracts the recorded fields from symlink (non-following) metadata.
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        let kind = LiveKind::from_file_type(meta.file_type());
        let device = match kind {
            LiveKind::CharDevice | LiveKind::BlockDevice => split_rdev(meta.rdev()),
            _ => (0, 0),
        };
        Self {
            kind,
            mode: meta.mode() & 0o7777,
            uid: u64::from(meta.uid()),
            gid: u64::from(meta.gid()),
            size: meta.size(),
            atime: NanoTime::from_parts(meta.atime(), meta.atime_nsec()),
            mtime: NanoTime::from_parts(meta.mtime(), meta.mtime_nsec()),
            device,
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }

    /// Full type+permission string, e.g. `drwxr-xr-x`.
    #[must_use]
    pub fn mode_string(&self) -> String {
        mode_string(self.kind.type_char(), self.mode)
    }
}

/// `lstat`s `path` without following a final symlink.
pub fn lstat(path: &Path) -> io::Result<LiveMetadata> {
    std::fs::symlink_metadata(path).map(|meta| LiveMetadata::from_metadata(&meta))
}

/// Splits a raw `st_rdev` into `(major, minor)` using the platform's own
/// encoding.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::unnecessary_cast
)]
#[must_use]
pub fn split_rdev(rdev: u64) -> (u32, u32) {
    let dev = rdev as libc::dev_t;
    (libc::major(dev) as u32, libc::minor(dev) as u32)
}
