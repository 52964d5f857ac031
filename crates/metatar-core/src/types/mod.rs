//! Core value types shared by the codec, writer, reader and verifier.

mod entry_kind;
mod mode;
mod timestamp;

pub use entry_kind::EntryKind;
pub use mode::mode_string;
pub use timestamp::NanoTime;
pub use timestamp::ParseNanoTimeError;
pub use timestamp::format_signed_seconds;
