//! Driver trait for abstracting user input and rendering.
//!
//! The [`Driver`] trait decouples the [`crate::Dispatcher`] from a concrete
//! terminal. The TUI implements it with crossterm and ratatui; tests
//! implement it with scripted input.

use std::future::Future;

use crate::{ConnectionState, Event, StateMachine};

/// What the driver observed while waiting for input.
#[derive(Debug)]
pub enum Input<H> {
    /// A user intent for the state machine.
    Event(Event<H>),
    /// Presentation-only change (resize, keystroke edit, animation tick).
    Redraw,
}

/// Platform-specific input capture and presentation.
pub trait Driver<H>: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user input.
    ///
    /// `state` is the current connection state, so input capture can decide
    /// whether a submission is a target or a message. Must be cancel-safe:
    /// the dispatcher drops the future when a completion arrives first.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn next_input(
        &mut self,
        state: ConnectionState,
    ) -> impl Future<Output = Result<Input<H>, Self::Error>> + Send;

    /// Render the state machine.
    ///
    /// Only ever called between transitions, never with a half-applied state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, machine: &StateMachine<H>) -> Result<(), Self::Error>;
}
