//! Error types for manifest operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ManifestError`.
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that abort a create, list or verify operation.
///
/// Conditions that are reported but never abort (skipped sockets, field
/// mismatches, names absent from the manifest) are not errors; they travel
/// as [`Diagnostic`](crate::report::Diagnostic) values instead.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container itself could not be read.
    #[error("invalid manifest: {0}")]
    InvalidArchive(String),

    /// An entry lacks an encoded field its kind requires, or carries one
    /// that cannot be decoded.
    #[error("malformed entry {path}: {reason}")]
    MalformedEntry {
        /// Path recorded in the offending entry.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A live filesystem object could not be read during create or verify.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The object being read.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A root path handed to create does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing root.
        path: PathBuf,
    },
}

impl ManifestError {
    /// Builds a `MalformedEntry` error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Builds a `Read` error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the manifest content (rather than the filesystem or
    /// the container framing) was at fault.
    ///
    /// # Examples
    ///
    /// ```
    /// use metatar_core::ManifestError;
    ///
    /// let err = ManifestError::malformed("a.txt", "missing size field");
    /// assert!(err.is_malformed());
    ///
    /// let err = ManifestError::InvalidArchive("truncated header".into());
    /// assert!(!err.is_malformed());
    /// ```
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEntry { .. })
    }

    /// Returns the path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MalformedEntry { path, .. }
            | Self::Read { path, .. }
            | Self::SourceNotFound { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_entry_display() {
        let err = ManifestError::malformed("dir/file", "missing METATAR.size");
        let display = err.to_string();
        assert!(display.contains("malformed entry"));
        assert!(display.contains("dir/file"));
        assert!(display.contains("METATAR.size"));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ManifestError = io_err.into();
        assert!(matches!(err, ManifestError::Io(_)));
        assert!(!err.is_malformed());
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_source_not_found_path() {
        let err = ManifestError::SourceNotFound {
            path: PathBuf::from("/nonexistent"),
        };
        assert_eq!(err.path(), Some(std::path::Path::new("/nonexistent")));
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn test_read_error_names_the_object() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ManifestError::read("tree/vanished.txt", io_err);
        assert_eq!(err.to_string(), "cannot read tree/vanished.txt: gone");
        assert_eq!(err.path(), Some(std::path::Path::new("tree/vanished.txt")));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_archive_display() {
        let err = ManifestError::InvalidArchive("bad checksum".to_string());
        assert_eq!(err.to_string(), "invalid manifest: bad checksum");
    }
}
