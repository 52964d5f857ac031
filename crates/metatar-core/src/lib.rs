//! Filesystem metadata manifests.
//!
//! `metatar-core` records the metadata of a filesystem tree (ownership,
//! permissions, nanosecond timestamps, sizes, symlink targets, device
//! numbers and a SHA-256 digest of every regular file) into a tar stream of
//! zero-length placeholder entries, and reads such a manifest back to list
//! it or to verify the live tree against it.
//!
//! The manifest is an ordinary pax tar archive; the extra fields live in
//! `METATAR.*` extended-header records (see [`codec`]).
//!
//! # Examples
//!
//! ```no_run
//! use metatar_core::CreateConfig;
//! use metatar_core::NameFilter;
//! use metatar_core::VerifyConfig;
//! use metatar_core::create_manifest;
//! use metatar_core::report::Diagnostic;
//! use metatar_core::report::NoopProgress;
//! use metatar_core::verify_manifest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut manifest = Vec::new();
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! create_manifest(
//!     &mut manifest,
//!     &["/etc"],
//!     &CreateConfig::default(),
//!     &mut diagnostics,
//!     &mut NoopProgress,
//! )?;
//!
//! let report = verify_manifest(
//!     manifest.as_slice(),
//!     &mut NameFilter::all(),
//!     &VerifyConfig::default(),
//!     &mut diagnostics,
//! )?;
//! println!("{} entries checked, {} differ", report.entries_checked, report.entries_mismatched);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(unix))]
compile_error!("metatar-core records POSIX metadata and only builds on Unix targets");

pub mod codec;
pub mod config;
pub mod creation;
pub mod error;
pub mod hasher;
pub mod inspection;
pub mod io;
pub mod manifest;
pub mod report;
pub mod stat;
pub mod types;

pub use config::CreateConfig;
pub use config::VerifyConfig;
pub use creation::create_manifest;
pub use error::ManifestError;
pub use error::Result;
pub use inspection::ManifestReader;
pub use inspection::NameFilter;
pub use inspection::list_manifest;
pub use inspection::verify_manifest;
pub use manifest::ManifestEntry;
pub use types::EntryKind;
pub use types::NanoTime;
