//! Error types for the command engine.
//!
//! Only *raised* failures live here. A command addressed to a key that holds
//! an incompatible type is not an error: it answers with a sentinel reply
//! (`Null`, `0`, or an empty collection) and leaves the keyspace untouched.

use thiserror::Error;

/// Errors raised by engine commands and the textual dispatcher.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmulatorError {
    /// The command was called in a form this emulator deliberately does not
    /// reproduce (for example, inserting several sorted-set members at once).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An argument could not be interpreted (non-numeric score, bad bound,
    /// mismatched weights, unknown option).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The dispatcher received the wrong number of arguments.
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(String),

    /// The dispatcher does not know the command name.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

impl EmulatorError {
    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        EmulatorError::UnsupportedOperation(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EmulatorError::InvalidArgument(msg.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EmulatorError>;
