//! Session-specific error types.

use std::io;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while driving the sqlite3 process.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to spawn the sqlite3 process.
    #[error("failed to spawn sqlite3 process: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Operation attempted on a session that is not open.
    #[error("session is not connected")]
    NotConnected,

    /// `close()` called on a session that was already closed.
    #[error("session is already closed")]
    AlreadyClosed,

    /// Failed to write to sqlite3 stdin.
    #[error("failed to write to sqlite3: {0}")]
    WriteFailed(#[source] io::Error),

    /// The sqlite3 process closed its streams before responding.
    #[error("sqlite3 process exited unexpectedly")]
    EngineExited,

    /// No sentinel observed within the configured deadline.
    #[error("query timed out after {timeout_ms} ms: {command}")]
    QueryTimeout {
        /// The command that was waiting for a response.
        command: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// sqlite3 wrote to its error stream while handling a command.
    #[error("sqlite3 error: {message}")]
    Engine {
        /// The command that produced the error output.
        command: String,
        /// Literal error text from the engine.
        message: String,
    },

    /// Response bytes were not valid JSON when structured decoding was requested.
    #[error("failed to decode response as JSON: {raw}")]
    Decode {
        /// The raw response that failed to parse.
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but not in row-list or row-object form.
    #[error("expected a row list, got: {raw}")]
    UnexpectedShape {
        /// The raw response with the unexpected shape.
        raw: String,
    },

    /// Malformed caller input to a convenience wrapper.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SessionError {
    /// Create an engine error from accumulated stderr output.
    pub fn engine(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Check whether the session's framing state can no longer be trusted.
    ///
    /// After a timeout the engine may still emit the stale response, and after
    /// an unexpected exit there is no process left to talk to. In both cases
    /// the recovery is to close the session and open a new one.
    pub fn requires_reopen(&self) -> bool {
        matches!(self, Self::QueryTimeout { .. } | Self::EngineExited)
    }
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        Self::WriteFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reopen() {
        assert!(SessionError::QueryTimeout {
            command: "SELECT 1;".to_string(),
            timeout_ms: 100,
        }
        .requires_reopen());
        assert!(SessionError::EngineExited.requires_reopen());
        assert!(!SessionError::NotConnected.requires_reopen());
        assert!(!SessionError::engine("SELECT 1;", "boom").requires_reopen());
    }

    #[test]
    fn test_timeout_message_includes_command() {
        let err = SessionError::QueryTimeout {
            command: "SELECT slow();".to_string(),
            timeout_ms: 250,
        };
        let text = err.to_string();
        assert!(text.contains("250 ms"));
        assert!(text.contains("SELECT slow();"));
    }
}
