//! Error types for connection operations.
//!
//! Errors originate inside connection manager tasks and only ever reach the
//! state machine inside a [`crate::Event::Failed`]. They are `Clone` and
//! `PartialEq` so the last one can be kept in state for display and compared
//! in tests; the underlying `std::io::Error` is flattened to its message.

use std::time::Duration;

use thiserror::Error;

/// Dialing a target failed. No session was created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Target is not of the form `host:port`.
    #[error("invalid address {target:?}: {reason}")]
    InvalidAddress {
        /// Target as submitted.
        target: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Resolution failed, or the connection was refused or unreachable.
    #[error("could not connect to {target}: {message}")]
    Dial {
        /// Target as submitted.
        target: String,
        /// Underlying error message.
        message: String,
    },

    /// Dial did not complete in time.
    #[error("timed out connecting to {target} after {after:?}")]
    Timeout {
        /// Target as submitted.
        target: String,
        /// Configured connect timeout.
        after: Duration,
    },
}

/// I/O on an established connection failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    /// Writing the payload failed.
    #[error("write failed: {0}")]
    Write(String),

    /// Reading the reply failed (including reset by peer).
    #[error("read failed: {0}")]
    Read(String),

    /// Remote closed the connection before replying.
    #[error("connection closed by remote")]
    ConnectionClosed,

    /// Shutting the socket down failed.
    #[error("close failed: {0}")]
    Close(String),
}

/// Any session-level error. All of them are recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Connect failed.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Send or close failed.
    #[error(transparent)]
    Io(#[from] IoError),
}
