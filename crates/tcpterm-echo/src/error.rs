//! Echo server error types.

use std::{io, net::SocketAddr};

use thiserror::Error;

/// Errors that stop the echo server.
///
/// Per-client I/O failures never surface here. They end that client's
/// connection and are logged.
#[derive(Debug, Error)]
pub enum EchoError {
    /// The bind address could not be parsed.
    #[error("invalid bind address '{address}': {reason}")]
    InvalidAddress {
        /// Address as given
        address: String,
        /// Parser message
        reason: String,
    },

    /// The listening socket could not be set up.
    #[error("failed to listen on {address}: {source}")]
    Listen {
        /// Address being bound
        address: SocketAddr,
        /// Underlying socket error
        source: io::Error,
    },

    /// I/O error on the listening socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
