//! # Error Module
//!
//! Errors surfaced by the editor core. Storage reads and writes are total and
//! never fail; errors only come from malformed arguments, command execution
//! and configuration loading.

/// Result alias used throughout the crate.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors produced by the editor core.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A raw axis, direction or similar argument was out of range.
    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: i64 },

    /// Undo or redo was requested on a command that never executed.
    #[error("Command '{command}' has not been executed")]
    NotExecuted { command: String },

    /// A command failed while running.
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Shorthand for an [`EditorError::InvalidArgument`].
    pub fn invalid_argument(what: &'static str, value: impl Into<i64>) -> Self {
        EditorError::InvalidArgument {
            what,
            value: value.into(),
        }
    }
}
