//! Error types for script encoding and running

use thiserror::Error;

/// A script token that cannot be turned into input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// `<name>` where `name` is not in the command table
    #[error("unknown script command '<{0}>'")]
    UnknownCommand(String),

    /// Bracketed text that is not `command` or `command-key`
    #[error("malformed script token '<{0}>'")]
    InvalidToken(String),

    /// `<name-key>` where `name` is not a modifier
    #[error("'{0}' cannot be combined with a key")]
    NotAModifier(String),

    /// The key exists but the layout produces no input for it
    #[error("no input for script token '<{0}>'")]
    Untranslatable(String),
}

/// Script runner error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("a script run is already in progress")]
    AlreadyRunning,
}
