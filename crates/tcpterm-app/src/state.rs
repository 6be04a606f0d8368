//! Observable application state types.
//!
//! This module defines the data the presentation layer reads:
//! [`ConnectionState`] and the [`MessageLog`] of a connected session.

use std::fmt;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for the user to submit a target.
    NotConnected,
    /// Dial in progress.
    Connecting,
    /// Connected with an established session.
    Connected,
    /// User quit. Terminal, no outgoing transitions.
    Closed,
}

impl ConnectionState {
    /// Whether a session exists in this state.
    pub fn has_session(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotConnected => "not connected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Which side produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent by the user.
    Sent,
    /// Received from the remote.
    Received,
}

impl Direction {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "you",
            Self::Received => "server",
        }
    }
}

/// One sent or received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLogEntry {
    /// Who produced it.
    pub direction: Direction,
    /// Message text. Received bytes are decoded lossily.
    pub content: String,
    /// Position within the session, starting at 0.
    pub sequence: u64,
}

impl fmt::Display for MessageLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.direction.label(), self.content)
    }
}

/// Ordered, append-only record of one session's exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: Vec<MessageLogEntry>,
    next_sequence: u64,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sent message. Returns its sequence number.
    pub fn push_sent(&mut self, content: impl Into<String>) -> u64 {
        self.push(Direction::Sent, content.into())
    }

    /// Append a received reply. Returns its sequence number.
    pub fn push_received(&mut self, bytes: &[u8]) -> u64 {
        self.push(Direction::Received, String::from_utf8_lossy(bytes).into_owned())
    }

    fn push(&mut self, direction: Direction, content: String) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.entries.push(MessageLogEntry { direction, content, sequence });
        sequence
    }

    /// All entries in order.
    pub fn entries(&self) -> &[MessageLogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rendered as `you: ...` / `server: ...` lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
