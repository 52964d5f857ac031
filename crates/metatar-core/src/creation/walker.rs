//! Deterministic, non-following directory tree walking.

use crate::ManifestError;
use crate::Result;
use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One object reached by the walk, with its `lstat` metadata.
#[derive(Debug, Clone)]
pub struct WalkedEntry {
    /// Path as walked: the root joined with each name below it.
    pub path: PathBuf,
    /// Metadata of the object itself, never of a symlink's target.
    pub metadata: Metadata,
}

/// Walks `root` depth-first, directory before contents, children in
/// file-name byte order.
///
/// Symlinks are never followed, including when `root` itself is one. Only
/// one directory listing is held at a time (for sorting), so memory does
/// not grow with the size of the tree.
///
/// # Errors
///
/// Items are errors if `root` does not exist
/// ([`ManifestError::SourceNotFound`]) or if any directory or metadata
/// cannot be read ([`ManifestError::Read`]).
///
/// # Examples
///
/// ```no_run
/// use metatar_core::creation::walker::walk;
/// use std::path::Path;
///
/// for entry in walk(Path::new("./project")) {
///     let entry = entry?;
///     println!("{}", entry.path.display());
/// }
/// # Ok::<(), metatar_core::ManifestError>(())
/// ```
pub fn walk(root: &Path) -> impl Iterator<Item = Result<WalkedEntry>> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            let entry = entry.map_err(|e| convert_walk_error(root, e))?;
            let metadata = entry.metadata().map_err(|e| convert_walk_error(root, e))?;
            Ok(WalkedEntry {
                path: entry.into_path(),
                metadata,
            })
        })
}

fn convert_walk_error(root: &Path, err: walkdir::Error) -> ManifestError {
    let root_missing = err.depth() == 0
        && err
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    if root_missing {
        return ManifestError::SourceNotFound {
            path: root.to_path_buf(),
        };
    }

    let path = err.path().map(Path::to_path_buf);
    match err.into_io_error() {
        Some(io) => match path {
            Some(path) => ManifestError::read(path, io),
            None => ManifestError::Io(io),
        },
        None => ManifestError::Io(std::io::Error::other(format!(
            "filesystem loop detected under {}",
            root.display()
        ))),
    }
}
