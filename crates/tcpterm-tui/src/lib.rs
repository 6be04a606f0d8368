//! Terminal UI for tcpterm
//!
//! A thin shell over [`tcpterm_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic
//! [`tcpterm_app::Dispatcher`].
//!
//! This crate only handles key capture, rendering and process bootstrap.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use input::{InputCapture, InputState, KeyInput, MESSAGE_CHAR_LIMIT, TARGET_CHAR_LIMIT};
pub use tcpterm_app::{Dispatcher, Driver, Event, StateMachine};
pub use terminal::{TerminalDriver, TerminalError};
