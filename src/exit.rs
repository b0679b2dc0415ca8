// src/exit.rs
//! Standardized process exit codes for `stylefit`.
//!
//! Provides a stable contract for scripts and automation.

use crate::error::StyleFitError;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StyleFitExit {
    /// Search completed and the style was written.
    Success = 0,
    /// Generic error (e.g. IO, internal state).
    Error = 1,
    /// Invalid configuration or flag values.
    InvalidInput = 2,
    /// The repository was not in a searchable state (dirty tree, no files).
    PreconditionFailed = 3,
    /// `git` or `clang-format` could not be run or exited non-zero.
    ToolFailure = 4,
}

impl StyleFitExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps a failed run to the exit code that best describes it.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<StyleFitError>() {
            Some(StyleFitError::Config(_) | StyleFitError::Yaml(_)) => Self::InvalidInput,
            Some(StyleFitError::Precondition(_)) => Self::PreconditionFailed,
            Some(
                StyleFitError::Tool { .. }
                | StyleFitError::ToolNotFound { .. }
                | StyleFitError::DiffParse { .. },
            ) => Self::ToolFailure,
            _ => Self::Error,
        }
    }
}

impl Termination for StyleFitExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
