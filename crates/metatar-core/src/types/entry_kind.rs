//! Manifest entry kind enumeration.

use std::path::PathBuf;

/// Kind of filesystem object recorded in a manifest entry.
///
/// Each variant carries exactly the fields meaningful for that kind: only
/// regular files have a content digest, only symlinks a target, only device
/// files a device number pair. Sockets cannot be represented and never
/// appear here; the walker skips them.
///
/// # Examples
///
/// ```
/// use metatar_core::types::EntryKind;
/// use std::path::PathBuf;
///
/// let file = EntryKind::Regular {
///     digest: "ab".repeat(32),
/// };
/// assert_eq!(file.type_char(), '-');
/// assert!(file.digest().is_some());
///
/// let link = EntryKind::Symlink {
///     target: PathBuf::from("../target"),
/// };
/// assert_eq!(link.type_char(), 'l');
/// assert!(link.digest().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with the hex digest of its content.
    Regular {
        /// Lowercase hex content digest.
        digest: String,
    },

    /// Directory.
    Directory,

    /// Symbolic link.
    Symlink {
        /// The link target, as stored (never resolved).
        target: PathBuf,
    },

    /// Character device.
    CharDevice {
        /// Device major number.
        major: u32,
        /// Device minor number.
        minor: u32,
    },

    /// Block device.
    BlockDevice {
        /// Device major number.
        major: u32,
        /// Device minor number.
        minor: u32,
    },

    /// Named pipe.
    Fifo,

    /// Any other entry type found in a manifest.
    Unknown,
}

impl EntryKind {
    /// Returns `true` for regular files.
    #[must_use]
    pub const fn is_regular(&self) -> bool {
        matches!(self, Self::Regular { .. })
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` for symlinks.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }

    /// Returns `true` for character and block devices.
    #[must_use]
    pub const fn is_device(&self) -> bool {
        matches!(self, Self::CharDevice { .. } | Self::BlockDevice { .. })
    }

    /// Content digest, present only for regular files.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Regular { digest } => Some(digest),
            _ => None,
        }
    }

    /// Symlink target, present only for symlinks.
    #[must_use]
    pub fn link_target(&self) -> Option<&std::path::Path> {
        match self {
            Self::Symlink { target } => Some(target),
            _ => None,
        }
    }

    /// Device `(major, minor)`, present only for device files.
    #[must_use]
    pub const fn device(&self) -> Option<(u32, u32)> {
        match self {
            Self::CharDevice { major, minor } | Self::BlockDevice { major, minor } => {
                Some((*major, *minor))
            }
            _ => None,
        }
    }

    /// The leading character of an `ls -l` style mode string.
    #[must_use]
    pub const fn type_char(&self) -> char {
        match self {
            Self::Regular { .. } => '-',
            Self::Directory => 'd',
            Self::Symlink { .. } => 'l',
            Self::CharDevice { .. } => 'c',
            Self::BlockDevice { .. } => 'b',
            Self::Fifo => 'p',
            Self::Unknown => '?',
        }
    }

    /// Short lowercase name, used in machine-readable output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Regular { .. } => "regular",
            Self::Directory => "directory",
            Self::Symlink { .. } => "symlink",
            Self::CharDevice { .. } => "char-device",
            Self::BlockDevice { .. } => "block-device",
            Self::Fifo => "fifo",
            Self::Unknown => "unknown",
        }
    }
}
