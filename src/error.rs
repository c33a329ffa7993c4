//! Error types used while processing a command line.

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// The only message a user ever sees for a fault.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// A fault raised while parsing or running a line.
///
/// The variants carry detail for the debug log. What reaches the user is
/// always [`ERROR_MESSAGE`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// A `>` without exactly one filename after it. Rejects the whole line.
    #[error("malformed redirection in `{0}`")]
    MalformedRedirection(String),

    #[error("{0}: command not found")]
    UnknownCommand(String),

    /// A built-in called with the wrong number of arguments.
    #[error("{name}: expected {expected}, got {given} argument(s)")]
    BuiltInUsage {
        name: &'static str,
        expected: &'static str,
        given: usize,
    },

    #[error("cd: {}: {source}", .path.display())]
    ChangeDirectory { path: PathBuf, source: io::Error },

    #[error("cannot open `{}` for redirection: {source}", .path.display())]
    OpenRedirect { path: PathBuf, source: io::Error },

    /// The process was created but the program could not be started.
    #[error("cannot execute `{}`: {source}", .path.display())]
    Exec { path: PathBuf, source: io::Error },

    /// The shell was started with more than one argument.
    #[error("usage: wish [batch-file], got {0} arguments")]
    Usage(usize),

    /// No new process could be created at all.
    #[error("cannot create process for `{}`: {source}", .path.display())]
    Spawn { path: PathBuf, source: io::Error },
}

impl ShellError {
    /// Whether the interpreter has to terminate instead of reading another
    /// line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Spawn { .. })
    }
}

/// Writes the generic error message to `sink`, logging the detail.
pub fn report(sink: &mut dyn Write, error: &ShellError) {
    log::debug!("{error}");
    display_error(sink);
}

/// Writes the generic error message to `sink`.
pub fn display_error(sink: &mut dyn Write) {
    // Nowhere left to complain to if this fails.
    let _ = sink.write_all(ERROR_MESSAGE.as_bytes());
    let _ = sink.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spawn_is_fatal() {
        let spawn = ShellError::Spawn {
            path: PathBuf::from("/bin/ls"),
            source: io::Error::from(io::ErrorKind::OutOfMemory),
        };
        assert!(spawn.is_fatal());
        assert!(!ShellError::UnknownCommand("nope".into()).is_fatal());
        assert!(!ShellError::MalformedRedirection("ls >".into()).is_fatal());
    }

    #[test]
    fn report_writes_generic_message() {
        let mut sink = Vec::new();
        report(&mut sink, &ShellError::UnknownCommand("nope".into()));
        assert_eq!(sink, ERROR_MESSAGE.as_bytes());
    }
}
