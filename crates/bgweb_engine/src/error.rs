//! Engine error types.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Why engine initialization failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InitErrorKind {
    /// An asset could not be read.
    #[display("missing asset '{_0}'")]
    Missing(String),
    /// An asset was read but its contents are unusable.
    #[display("malformed asset '{_0}'")]
    Malformed(String),
    /// An asset was written for a different format version.
    #[display("incompatible asset '{_0}'")]
    Incompatible(String),
}

/// Fatal error raised while bringing the engine into a ready state.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine init error: {}: {} at {}:{}", kind, message, file, line)]
pub struct InitError {
    /// What went wrong.
    pub kind: InitErrorKind,
    /// Underlying detail.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InitError {
    /// Creates a new init error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: InitErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%kind, error_message = %message, "Engine initialization failed");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Error raised by an engine while computing moves.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine error: {} at {}:{}", message, file, line)]
pub struct EngineError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new engine error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
