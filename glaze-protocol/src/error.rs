//! Error types for redraw decoding

use thiserror::Error;

/// Redraw decoding error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Command name not in the known set
    #[error("unknown redraw command '{0}'")]
    UnknownCommand(String),

    /// A required positional argument is absent
    #[error("'{command}' is missing argument {index}")]
    MissingArgument { command: String, index: usize },

    /// An argument has the wrong type
    #[error("'{command}' argument {index}: expected {expected}")]
    InvalidArgument {
        command: String,
        index: usize,
        expected: &'static str,
    },

    /// A framed line could not be parsed
    #[error("malformed batch: {0}")]
    Malformed(String),
}

/// Result type for redraw decoding
pub type Result<T> = std::result::Result<T, DecodeError>;
