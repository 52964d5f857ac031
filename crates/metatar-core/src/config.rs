//! Configuration for create and verify operations.

use crate::hasher::DEFAULT_CHUNK_SIZE;

/// Configuration for manifest creation.
///
/// # Examples
///
/// ```
/// use metatar_core::CreateConfig;
///
/// let config = CreateConfig::default()
///     .with_chunk_size(1024 * 1024)
///     .with_skip_identity(Some((64769, 1234)));
/// assert!(config.use_noatime);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConfig {
    /// Read size used while hashing regular files.
    ///
    /// Default: 64 KiB.
    pub chunk_size: usize,

    /// Open files with `O_NOATIME` where supported.
    ///
    /// Default: `true`.
    pub use_noatime: bool,

    /// `(device, inode)` of an object to leave out of the walk, normally the
    /// manifest file being written.
    ///
    /// Default: `None`.
    pub skip_identity: Option<(u64, u64)>,
}

impl Default for CreateConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            use_noatime: true,
            skip_identity: None,
        }
    }
}

impl CreateConfig {
    /// Creates a new `CreateConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hashing chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets whether to request `O_NOATIME`.
    #[must_use]
    pub fn with_noatime(mut self, use_noatime: bool) -> Self {
        self.use_noatime = use_noatime;
        self
    }

    /// Sets the `(device, inode)` to skip.
    #[must_use]
    pub fn with_skip_identity(mut self, identity: Option<(u64, u64)>) -> Self {
        self.skip_identity = identity;
        self
    }
}

/// Configuration for manifest verification.
///
/// # Examples
///
/// ```
/// use metatar_core::VerifyConfig;
///
/// let config = VerifyConfig::default().with_check_atime(false);
/// assert!(!config.check_atime);
/// assert!(config.check_content);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Read size used while re-hashing regular files.
    ///
    /// Default: 64 KiB.
    pub chunk_size: usize,

    /// Compare access times.
    ///
    /// Default: `true`.
    pub check_atime: bool,

    /// Re-hash regular files and compare digests.
    ///
    /// Default: `true`.
    pub check_content: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            check_atime: true,
            check_content: true,
        }
    }
}

impl VerifyConfig {
    /// Creates a new `VerifyConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hashing chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets whether access times are compared.
    #[must_use]
    pub fn with_check_atime(mut self, check: bool) -> Self {
        self.check_atime = check;
        self
    }

    /// Sets whether content digests are compared.
    #[must_use]
    pub fn with_check_content(mut self, check: bool) -> Self {
        self.check_content = check;
        self
    }
}
