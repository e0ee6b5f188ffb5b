//! Error types for the shell.

use std::io;

/// Errors produced while reading, resolving or running a command line.
///
/// The `Display` form of every recoverable variant is the exact message the
/// user sees on standard error.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to switch the terminal into raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("failed to read from standard input: {0}")]
    Input(#[source] io::Error),

    #[error("standard input was closed")]
    InputClosed,

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("{0}: missing argument")]
    MissingArgument(&'static str),

    #[error("exit: {0}: numeric argument required")]
    InvalidExitCode(String),

    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Whether the error must terminate the shell instead of re-prompting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::RawMode(_) | ShellError::Input(_) | ShellError::InputClosed
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
