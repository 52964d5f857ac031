//! Manifest creation.
//!
//! Walks filesystem roots and writes one placeholder entry per object.

pub mod creator;
pub mod names;
pub mod walker;
pub mod writer;

pub use creator::create_manifest;
pub use names::NameCache;
pub use walker::WalkedEntry;
pub use writer::ManifestWriter;
