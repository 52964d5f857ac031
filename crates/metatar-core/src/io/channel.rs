//! Manifest channels: a named file or a standard stream.

use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::path::PathBuf;

/// Where a manifest is read from or written to.
///
/// Standard streams are used strictly sequentially; named files are too,
/// since the manifest format never needs to seek.
///
/// # Examples
///
/// ```
/// use metatar_core::io::Channel;
/// use std::ffi::OsStr;
///
/// assert_eq!(Channel::from_arg(None), Channel::Std);
/// assert_eq!(Channel::from_arg(Some(OsStr::new("-"))), Channel::Std);
/// assert!(matches!(
///     Channel::from_arg(Some(OsStr::new("tree.mtar"))),
///     Channel::File(_)
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Standard input when reading, standard output when writing.
    Std,
    /// A named file.
    File(PathBuf),
}

impl Channel {
    /// Interprets a command-line name; absent or `-` selects the standard
    /// stream.
    #[must_use]
    pub fn from_arg(name: Option<&OsStr>) -> Self {
        match name {
            None => Self::Std,
            Some(name) if name == "-" => Self::Std,
            Some(name) => Self::File(PathBuf::from(name)),
        }
    }

    /// The file path, if this is a named channel.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Std => None,
            Self::File(path) => Some(path),
        }
    }

    /// Opens the channel for sequential reading.
    pub fn open_read(&self) -> io::Result<Box<dyn Read>> {
        Ok(match self {
            Self::Std => Box::new(BufReader::new(io::stdin().lock())),
            Self::File(path) => Box::new(BufReader::new(File::open(path)?)),
        })
    }

    /// Opens the channel for writing, truncating a named file.
    ///
    /// Returns the writer together with the `(device, inode)` of the named
    /// file, so a walk can recognise the manifest it is producing.
    pub fn create_write(&self) -> io::Result<(Box<dyn Write>, Option<(u64, u64)>)> {
        Ok(match self {
            Self::Std => (Box::new(BufWriter::new(io::stdout().lock())), None),
            Self::File(path) => {
                let file = File::create(path)?;
                let meta = file.metadata()?;
                (
                    Box::new(BufWriter::new(file)),
                    Some((meta.dev(), meta.ino())),
                )
            }
        })
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Std => write!(f, "-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
