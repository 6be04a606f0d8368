//! Application layer for tcpterm
//!
//! Pure connection lifecycle state machine plus a generic dispatcher that
//! serializes every state mutation, so the same logic runs against a real
//! terminal and socket or against scripted doubles in tests.
//!
//! # Components
//!
//! - [`StateMachine`]: connection lifecycle (NotConnected, Connecting,
//!   Connected, Closed) with the epoch guard for stale completions
//! - [`ConnectionManager`]: trait for the async connect/send/close operations
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Dispatcher`]: single-threaded loop tying the three together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod dispatcher;
mod driver;
mod error;
mod event;
mod machine;
mod manager;
mod session;
mod state;

pub use command::Command;
pub use dispatcher::Dispatcher;
pub use driver::{Driver, Input};
pub use error::{ConnectError, ConnectionError, IoError};
pub use event::Event;
pub use machine::StateMachine;
pub use manager::ConnectionManager;
pub use session::{Epoch, Session, SessionInfo};
pub use state::{ConnectionState, Direction, MessageLog, MessageLogEntry};
