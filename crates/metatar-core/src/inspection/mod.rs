//! Reading manifests back: filtering, listing and verification.

pub mod filter;
pub mod list;
pub mod reader;
pub mod verify;

pub use filter::NameFilter;
pub use list::list_manifest;
pub use list::render_long;
pub use list::render_long_in;
pub use list::render_short;
pub use reader::ManifestReader;
pub use verify::EntryStatus;
pub use verify::Verifier;
pub use verify::verify_manifest;
