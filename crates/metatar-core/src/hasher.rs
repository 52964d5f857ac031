//! Content digests of regular files.

use crate::report::ProgressCallback;
use sha2::Digest;
use sha2::Sha256;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::path::Path;

/// Default read size for hashing.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Length of a hex digest produced by [`FileHasher`].
pub const DIGEST_HEX_LEN: usize = 64;

/// Streams regular files through SHA-256.
///
/// Files are opened read-only with `O_NOATIME` where the platform has it, so
/// hashing does not disturb the access times a manifest records. When the
/// kernel refuses the flag (the caller does not own the file) the open is
/// retried without it, and the read may then move the file's atime; the
/// manifest writer takes its atime from a fresh `lstat` after hashing.
///
/// The caller must only hand regular files to [`FileHasher::hash_file`];
/// opening a FIFO would block and a device could be endless.
///
/// # Examples
///
/// ```no_run
/// use metatar_core::hasher::FileHasher;
/// use std::path::Path;
///
/// let mut hasher = FileHasher::new();
/// let digest = hasher.hash_file(Path::new("Cargo.toml"))?;
/// assert_eq!(digest.len(), 64);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct FileHasher {
    buffer: Vec<u8>,
    use_noatime: bool,
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHasher {
    /// Creates a hasher with the default chunk size and `O_NOATIME` enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DEFAULT_CHUNK_SIZE, true)
    }

    /// Creates a hasher with an explicit chunk size.
    ///
    /// A zero chunk size is raised to 1.
    #[must_use]
    pub fn with_options(chunk_size: usize, use_noatime: bool) -> Self {
        Self {
            buffer: vec![0u8; chunk_size.max(1)],
            use_noatime,
        }
    }

    /// Returns the lowercase hex digest of the file at `path`.
    pub fn hash_file(&mut self, path: &Path) -> io::Result<String> {
        self.hash_file_with_progress(path, &mut crate::report::NoopProgress)
    }

    /// Like [`hash_file`](Self::hash_file), reporting bytes read to
    /// `progress`.
    pub fn hash_file_with_progress(
        &mut self,
        path: &Path,
        progress: &mut dyn ProgressCallback,
    ) -> io::Result<String> {
        let mut file = self.open(path)?;
        let mut hasher = Sha256::new();

        loop {
            let n = match file.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&self.buffer[..n]);
            progress.on_bytes_hashed(n as u64);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Returns the hex digest of an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn open(&self, path: &Path) -> io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;

        if self.use_noatime {
            match OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NOATIME)
                .open(path)
            {
                Err(e) if e.raw_os_error() == Some(libc::EPERM) => {
                    tracing::trace!(path = %path.display(), "O_NOATIME refused, reopening");
                }
                other => return other,
            }
        }
        OpenOptions::new().read(true).open(path)
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn open(&self, path: &Path) -> io::Result<File> {
        let _ = self.use_noatime;
        OpenOptions::new().read(true).open(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // sha256("hello")
    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
    // sha256("")
    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_hash_known_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hello.txt");
        fs::write(&path, b"hello").unwrap();

        let digest = FileHasher::new().hash_file(&path).unwrap();
        assert_eq!(digest, HELLO);
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_hash_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert_eq!(FileHasher::new().hash_file(&path).unwrap(), EMPTY);
    }

    #[test]
    fn test_tiny_chunks_match_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let a = FileHasher::new().hash_file(&path).unwrap();
        let b = FileHasher::with_options(7, false).hash_file(&path).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, FileHasher::hash_bytes(&data));
    }

    #[test]
    fn test_hash_reports_bytes() {
        struct Count(u64);
        impl ProgressCallback for Count {
            fn on_entry(&mut self, _: &Path) {}
            fn on_bytes_hashed(&mut self, bytes: u64) {
                self.0 += bytes;
            }
            fn on_complete(&mut self) {}
        }

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f");
        fs::write(&path, vec![1u8; 3000]).unwrap();

        let mut count = Count(0);
        FileHasher::with_options(1024, true)
            .hash_file_with_progress(&path, &mut count)
            .unwrap();
        assert_eq!(count.0, 3000);
    }

    #[test]
    fn test_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let err = FileHasher::new()
            .hash_file(&temp.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
