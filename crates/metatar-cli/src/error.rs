//! Error conversion utilities for CLI.
//!
//! Converts metatar-core's typed errors (thiserror) into user-facing
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use metatar_core::ManifestError;
use std::fmt::Display;

/// Converts a `ManifestError` into an anyhow error naming `manifest`.
pub fn convert_manifest_error(err: ManifestError, manifest: &dyn Display) -> anyhow::Error {
    match err {
        ManifestError::MalformedEntry { path, reason } => {
            anyhow!(
                "Malformed entry '{}' in manifest '{manifest}': {reason}\n\
                 HINT: The manifest may be truncated or written by a tool other than metatar.",
                path.display()
            )
        }
        ManifestError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid manifest '{manifest}': {reason}\n\
                 HINT: The manifest may be corrupted or not a tar stream."
            )
        }
        ManifestError::Read { path, source } => {
            anyhow!("Cannot read '{}': {source}", path.display())
        }
        ManifestError::SourceNotFound { path } => {
            anyhow!("Cannot record '{}': no such file or directory", path.display())
        }
        ManifestError::Io(io_err) => {
            anyhow!("I/O error while processing '{manifest}': {io_err}")
        }
    }
}

/// Adds manifest context to a core result.
pub fn add_manifest_context<T>(
    result: Result<T, ManifestError>,
    manifest: &dyn Display,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_manifest_error(e, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_malformed_entry() {
        let err = ManifestError::malformed("a/b", "missing METATAR.size");
        let msg = format!("{:?}", convert_manifest_error(err, &"tree.mtar"));
        assert!(msg.contains("a/b"));
        assert!(msg.contains("tree.mtar"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_source_not_found() {
        let err = ManifestError::SourceNotFound {
            path: PathBuf::from("nowhere"),
        };
        let msg = convert_manifest_error(err, &"-").to_string();
        assert!(msg.contains("nowhere"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_convert_read_error_names_the_file() {
        let err = ManifestError::read(
            "tree/gone.txt",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        let msg = convert_manifest_error(err, &"-").to_string();
        assert_eq!(msg, "Cannot read 'tree/gone.txt': No such file or directory");
    }

    #[test]
    fn test_convert_io_error() {
        let err = ManifestError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let msg = convert_manifest_error(err, &"m.tar").to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("m.tar"));
    }
}
