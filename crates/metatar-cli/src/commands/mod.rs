//! Command implementations.

pub mod completion;
pub mod create;
pub mod list;
pub mod verify;

use std::process::ExitCode;

/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was done and nothing differed.
    Success,
    /// Verification found mismatching or missing entries.
    Differences,
    /// At least one requested name was not in the manifest. Kept apart
    /// from 2, which clap uses for usage errors.
    NotFound,
}

impl Outcome {
    /// Process exit status: 0, 1 or 3.
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Differences => 1,
            Self::NotFound => 3,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
