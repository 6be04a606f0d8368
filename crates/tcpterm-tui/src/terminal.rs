//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Sockets are not touched here;
//! they belong to the connection manager.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tcpterm_app::{ConnectionState, Driver, Event, Input, StateMachine};
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior};

use crate::{InputCapture, KeyInput, ui};

/// Redraw period, which also paces the spinner.
const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm) and rendering (ratatui). Owns the
/// input capture and the spinner, which are presentation state only.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    ticker: Interval,
    capture: InputCapture,
    spinner: ui::Spinner,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    ///
    /// `default_target` is offered as the placeholder target. Must be called
    /// inside a tokio runtime. If setup fails after raw mode was entered,
    /// the terminal is restored before the error is returned.
    pub fn new(default_target: String) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let terminal = restore_on_error(enter_screen(), restore_terminal)?;

        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            ticker,
            capture: InputCapture::new(default_target),
            spinner: ui::Spinner::default(),
        })
    }

    /// Convert a crossterm key event to `KeyInput`.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(KeyInput::Interrupt),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

/// Switch to the alternate screen and build the ratatui terminal.
fn enter_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    stdout().execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

/// Leave raw mode and the alternate screen. Failures are ignored.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

/// Run `restore` when `result` is an error, then pass `result` through.
fn restore_on_error<T, E>(result: Result<T, E>, restore: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        restore();
    }
    result
}

impl<H: Send + 'static> Driver<H> for TerminalDriver {
    type Error = TerminalError;

    async fn next_input(&mut self, state: ConnectionState) -> Result<Input<H>, TerminalError> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        let event = Self::convert_key(key)
                            .and_then(|key| self.capture.handle_key(key, state));
                        Ok(event.map_or(Input::Redraw, Input::Event))
                    },
                    Some(Ok(_)) => Ok(Input::Redraw),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    // Input is gone, nothing can drive the session any more.
                    None => Ok(Input::Event(Event::UserCancel)),
                }
            }

            // Tick
            _ = self.ticker.tick() => {
                if state == ConnectionState::Connecting {
                    self.spinner.advance();
                }
                Ok(Input::Redraw)
            }
        }
    }

    fn render(&mut self, machine: &StateMachine<H>) -> Result<(), TerminalError> {
        self.terminal.draw(|frame| {
            ui::render(frame, machine, &self.capture, &self.spinner);
        })?;
        Ok(())
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        restore_terminal();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(0);

        let failed: io::Result<()> = Err(io::Error::other("no tty"));
        let result = restore_on_error(failed, || restored.set(restored.get() + 1));
        assert!(result.is_err());
        assert_eq!(restored.get(), 1);

        let result = restore_on_error(io::Result::Ok(()), || restored.set(restored.get() + 1));
        assert!(result.is_ok());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(TerminalDriver::convert_key(key), Some(KeyInput::Interrupt));

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(TerminalDriver::convert_key(key), Some(KeyInput::Char('c')));
    }

    #[test]
    fn other_control_chords_are_ignored() {
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(TerminalDriver::convert_key(key), None);
    }

    #[test]
    fn shifted_chars_are_typed() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(TerminalDriver::convert_key(key), Some(KeyInput::Char('A')));
    }
}
