use crate::result::{RecordSet, TextResults};
use std::fmt;

/// Result type for p4bridge-protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while executing a command
#[derive(Debug)]
pub enum Error {
    /// A user callback failed; captured during the command loop and
    /// re-raised once the engine returned control
    Callback(anyhow::Error),

    /// The engine itself failed (could not establish or drive a session)
    Engine(String),

    /// The command completed with errors (or warnings, depending on the
    /// configured exception level); carries the full parsed result
    Command(Box<RecordSet>),

    /// Unparsed variant of `Command`
    CommandUnparsed(Box<TextResults>),

    /// A form-style command was issued through a run path that cannot
    /// service editor requests
    FormCommand,

    /// A resolve was requested but the callback in use does not merge
    MergeUnsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Callback(err) => write!(f, "callback failed: {}", err),
            Error::Engine(msg) => write!(f, "engine error: {}", msg),
            Error::Command(result) => {
                write!(f, "command failed: {}", result.error_message())
            }
            Error::CommandUnparsed(result) => {
                write!(f, "command failed: {}", result.error_message())
            }
            Error::FormCommand => {
                write!(f, "form commands cannot be run through this path")
            }
            Error::MergeUnsupported => {
                write!(f, "resolve requested but this callback does not merge")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Callback(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
