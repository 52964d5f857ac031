//! Requested-name filter for list and verify.

use crate::manifest::ManifestEntry;
use crate::report::Diagnostic;
use crate::report::DiagnosticSink;
use std::collections::BTreeSet;
use std::ffi::OsString;

/// The set of names a list or verify was asked about.
///
/// Owned by the caller and threaded through a single scan. Each name is
/// consumed by the first entry it matches; whatever is left afterwards was
/// never found.
///
/// An empty filter matches every entry. A filter that started non-empty
/// keeps rejecting entries even after all of its names are consumed.
///
/// # Examples
///
/// ```
/// use metatar_core::NameFilter;
///
/// let mut filter = NameFilter::new(["docs/", "missing"]);
/// assert!(filter.take("docs/"));
/// assert!(!filter.take("docs/"));
///
/// let mut unmatched: Vec<metatar_core::report::Diagnostic> = Vec::new();
/// let left = filter.drain_unmatched(&mut unmatched);
/// assert_eq!(left, vec![std::ffi::OsString::from("missing")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    remaining: BTreeSet<OsString>,
    active: bool,
}

impl NameFilter {
    /// Creates a filter over `names`. No names means "everything".
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let remaining: BTreeSet<OsString> = names.into_iter().map(Into::into).collect();
        let active = !remaining.is_empty();
        Self { remaining, active }
    }

    /// A filter that matches every entry.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns `true` if this filter was created with names.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Names not yet matched, in sorted order.
    pub fn remaining(&self) -> impl Iterator<Item = &OsString> {
        self.remaining.iter()
    }

    /// Matches `key`, consuming it on success.
    pub fn take(&mut self, key: impl AsRef<std::ffi::OsStr>) -> bool {
        !self.active || self.remaining.remove(key.as_ref())
    }

    /// Matches an entry by its [`filter_key`](ManifestEntry::filter_key).
    pub fn matches(&mut self, entry: &ManifestEntry) -> bool {
        self.take(entry.filter_key())
    }

    /// Emits a `NotFound` diagnostic for each unmatched name, sorted, and
    /// returns those names.
    pub fn drain_unmatched(&mut self, sink: &mut dyn DiagnosticSink) -> Vec<OsString> {
        let unmatched: Vec<OsString> = std::mem::take(&mut self.remaining).into_iter().collect();
        for name in &unmatched {
            sink.emit(&Diagnostic::NotFound { name: name.clone() });
        }
        unmatched
    }
}
