//! Owner and group name lookup.

use nix::unistd::Gid;
use nix::unistd::Group;
use nix::unistd::Uid;
use nix::unistd::User;
use std::collections::HashMap;

/// Resolves numeric ids to user and group names, caching each id.
///
/// The cache grows with the number of distinct owners in a tree, not with
/// the number of entries. Ids without a database entry resolve to `None`.
#[derive(Debug, Default)]
pub struct NameCache {
    users: HashMap<u64, Option<String>>,
    groups: HashMap<u64, Option<String>>,
}

impl NameCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// User name for `uid`.
    pub fn user(&mut self, uid: u64) -> Option<String> {
        self.users
            .entry(uid)
            .or_insert_with(|| {
                let raw = libc::uid_t::try_from(uid).ok()?;
                User::from_uid(Uid::from_raw(raw))
                    .ok()
                    .flatten()
                    .map(|user| user.name)
            })
            .clone()
    }

    /// Group name for `gid`.
    pub fn group(&mut self, gid: u64) -> Option<String> {
        self.groups
            .entry(gid)
            .or_insert_with(|| {
                let raw = libc::gid_t::try_from(gid).ok()?;
                Group::from_gid(Gid::from_raw(raw))
                    .ok()
                    .flatten()
                    .map(|group| group.name)
            })
            .clone()
    }
}
