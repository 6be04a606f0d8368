//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and turns
//! key presses into state machine events. Which buffer a key edits, and
//! what Enter submits, depends on the current connection state.

use tcpterm_app::{ConnectionState, Event};

/// Maximum length of a target, in characters.
pub const TARGET_CHAR_LIMIT: usize = 156;

/// Maximum length of a message, in characters.
pub const MESSAGE_CHAR_LIMIT: usize = 280;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Ctrl+C.
    Interrupt,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Single-line text buffer with a cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// correctly. Input past the character limit is dropped.
#[derive(Debug)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
    /// Maximum length in characters.
    limit: usize,
}

impl InputState {
    /// Create an empty input accepting at most `limit` characters.
    pub fn with_limit(limit: usize) -> Self {
        Self { buffer: String::new(), cursor: 0, limit }
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Apply an editing key. Non-editing keys are ignored.
    pub fn edit(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char(c) => {
                if self.buffer.chars().count() < self.limit {
                    let at = self.byte_index();
                    self.buffer.insert(at, c);
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index();
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                let at = self.byte_index();
                if at < self.buffer.len() {
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.buffer.chars().count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.buffer.chars().count(),
            KeyInput::Enter | KeyInput::Esc | KeyInput::Interrupt => {},
        }
    }

    /// Take the buffer, leaving it empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn byte_index(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }
}

/// The target and message inputs, and the rules for submitting them.
#[derive(Debug)]
pub struct InputCapture {
    target: InputState,
    message: InputState,
    default_target: String,
}

impl InputCapture {
    /// Create input capture. An empty target submission dials
    /// `default_target`.
    pub fn new(default_target: impl Into<String>) -> Self {
        Self {
            target: InputState::with_limit(TARGET_CHAR_LIMIT),
            message: InputState::with_limit(MESSAGE_CHAR_LIMIT),
            default_target: default_target.into(),
        }
    }

    /// Target input, edited while not connected.
    pub fn target(&self) -> &InputState {
        &self.target
    }

    /// Message input, edited while connected.
    pub fn message(&self) -> &InputState {
        &self.message
    }

    /// Target dialed when the target input is empty.
    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    /// Handle a key press in the given connection state.
    ///
    /// Returns the event to dispatch, or `None` if the key only edited
    /// input (or did nothing).
    pub fn handle_key<H>(&mut self, key: KeyInput, state: ConnectionState) -> Option<Event<H>> {
        match key {
            KeyInput::Esc => Some(Event::UserCancel),
            KeyInput::Interrupt => Some(Event::UserRequestClose),
            KeyInput::Enter => self.submit(state),
            edit => {
                match state {
                    ConnectionState::NotConnected => self.target.edit(edit),
                    ConnectionState::Connected => self.message.edit(edit),
                    ConnectionState::Connecting | ConnectionState::Closed => {},
                }
                None
            },
        }
    }

    fn submit<H>(&mut self, state: ConnectionState) -> Option<Event<H>> {
        match state {
            // The target stays in the input so a failed attempt can be edited.
            ConnectionState::NotConnected if self.target.is_empty() => {
                Some(Event::UserSubmitTarget(self.default_target.clone()))
            },
            ConnectionState::NotConnected => {
                Some(Event::UserSubmitTarget(self.target.buffer().to_string()))
            },
            ConnectionState::Connected if !self.message.is_empty() => {
                Some(Event::UserSubmitMessage(self.message.take()))
            },
            _ => None,
        }
    }
}
