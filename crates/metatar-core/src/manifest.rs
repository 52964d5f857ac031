//! Manifest entry data structure.

use crate::types::EntryKind;
use crate::types::NanoTime;
use crate::types::mode_string;
use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

/// One recorded filesystem object.
///
/// Entries are built once by create and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path as walked, relative or absolute. Not required to be UTF-8.
    pub path: PathBuf,
    /// Object kind with its kind-specific payload.
    pub kind: EntryKind,
    /// Permission bits, including setuid/setgid/sticky.
    pub mode: u32,
    /// Owner user id.
    pub uid: u64,
    /// Owner group id.
    pub gid: u64,
    /// Owner user name, if it was resolvable at creation time.
    pub owner: Option<String>,
    /// Owner group name, if it was resolvable at creation time.
    pub group: Option<String>,
    /// Logical size of the original object.
    pub size: u64,
    /// Access time.
    pub atime: NanoTime,
    /// Modification time.
    pub mtime: NanoTime,
}

impl ManifestEntry {
    /// Raw path bytes, with a trailing `/` for directories.
    ///
    /// This is the key filter names are matched against: `dir/` selects a
    /// directory entry while `dir` does not.
    #[must_use]
    pub fn filter_key(&self) -> OsString {
        let mut bytes = trimmed_path_bytes(&self.path).to_vec();
        if self.kind.is_directory() && bytes.last() != Some(&b'/') {
            bytes.push(b'/');
        }
        std::os::unix::ffi::OsStringExt::from_vec(bytes)
    }

    /// Name for display: the filter key decoded lossily, so bytes that are
    /// not UTF-8 become U+FFFD instead of failing.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.filter_key().to_string_lossy().into_owned()
    }

    /// Full type+permission string, e.g. `-rw-r--r--`.
    #[must_use]
    pub fn mode_string(&self) -> String {
        mode_string(self.kind.type_char(), self.mode)
    }

    /// `owner/group`, falling back to numeric ids for unresolved names.
    #[must_use]
    pub fn owner_group(&self) -> String {
        let owner = self
            .owner
            .clone()
            .unwrap_or_else(|| self.uid.to_string());
        let group = self
            .group
            .clone()
            .unwrap_or_else(|| self.gid.to_string());
        format!("{owner}/{group}")
    }
}

/// Path bytes without trailing slashes (except a lone `/`).
fn trimmed_path_bytes(path: &std::path::Path) -> &[u8] {
    let mut bytes = path.as_os_str().as_bytes();
    while bytes.len() > 1 && bytes.last() == Some(&b'/') {
        bytes = &bytes[..bytes.len() - 1];
    }
    bytes
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::os::unix::ffi::OsStringExt;

    pub(crate) fn sample(path: &str, kind: EntryKind) -> ManifestEntry {
        ManifestEntry {
            path: PathBuf::from(path),
            kind,
            mode: 0o644,
            uid: 1000,
            gid: 1000,
            owner: Some("alice".to_string()),
            group: Some("staff".to_string()),
            size: 0,
            atime: NanoTime::from_parts(1_700_000_000, 0),
            mtime: NanoTime::from_parts(1_700_000_000, 0),
        }
    }

    #[test]
    fn test_directory_key_gets_trailing_slash() {
        let entry = sample("a/b", EntryKind::Directory);
        assert_eq!(entry.filter_key(), OsString::from("a/b/"));
        assert_eq!(entry.display_name(), "a/b/");
    }

    #[test]
    fn test_directory_key_not_doubled() {
        let entry = sample("a/b//", EntryKind::Directory);
        assert_eq!(entry.filter_key(), OsString::from("a/b/"));
        let root = sample("/", EntryKind::Directory);
        assert_eq!(root.filter_key(), OsString::from("/"));
    }

    #[test]
    fn test_file_key_plain() {
        let entry = sample("a/b", EntryKind::Fifo);
        assert_eq!(entry.filter_key(), OsString::from("a/b"));
    }

    #[test]
    fn test_display_name_replaces_invalid_bytes() {
        let mut entry = sample("x", EntryKind::Fifo);
        entry.path = PathBuf::from(OsString::from_vec(b"caf\xe9".to_vec()));
        assert_eq!(entry.display_name(), "caf\u{fffd}");
    }

    #[test]
    fn test_owner_group_falls_back_to_ids() {
        let mut entry = sample("x", EntryKind::Fifo);
        assert_eq!(entry.owner_group(), "alice/staff");
        entry.owner = None;
        entry.group = None;
        assert_eq!(entry.owner_group(), "1000/1000");
    }

    #[test]
    fn test_mode_string() {
        let mut entry = sample("d", EntryKind::Directory);
        entry.mode = 0o755;
        assert_eq!(entry.mode_string(), "drwxr-xr-x");
    }
}
