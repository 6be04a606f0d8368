//! TCP transport for tcpterm
//!
//! Implements [`tcpterm_app::ConnectionManager`] over tokio sockets. Every
//! operation is a single self-contained future; the dispatcher decides when
//! and where it runs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod manager;

pub use config::{DEFAULT_CONNECT_TIMEOUT, ManagerConfig, REPLY_BUFFER_CAPACITY};
pub use manager::{TcpConnectionManager, exchange, parse_target};
