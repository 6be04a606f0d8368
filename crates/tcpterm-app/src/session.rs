//! Live connection handle and its identity epoch.
//!
//! A [`Session`] is the only way to reach a socket. It is not `Clone`: the
//! handle moves into whichever [`crate::Command`] is in flight and comes back
//! inside the completion [`crate::Event`], so two operations can never hold
//! the same connection at once.

use std::fmt;

/// Identifier distinguishing connection attempts.
///
/// The [`crate::StateMachine`] mints a new epoch for every connect it issues.
/// Completions carry the epoch they were issued against, which is how stale
/// completions from superseded attempts are recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Wrap a raw epoch value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw epoch value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The epoch following this one.
    pub(crate) const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.get())
    }
}

/// A live connection: socket handle plus the epoch it was opened under.
///
/// Generic over the handle so the state machine can be driven with plain
/// marker values in tests and with a real socket in production.
#[derive(Debug)]
pub struct Session<H> {
    epoch: Epoch,
    remote_addr: String,
    handle: H,
}

impl<H> Session<H> {
    /// Create a session for a freshly established connection.
    pub fn new(epoch: Epoch, remote_addr: impl Into<String>, handle: H) -> Self {
        Self { epoch, remote_addr: remote_addr.into(), handle }
    }

    /// Epoch this session was opened under.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Remote peer address.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Shared access to the socket handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Exclusive access to the socket handle for I/O.
    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Consume the session and release the handle.
    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Handle-free description of this session.
    pub fn info(&self) -> SessionInfo {
        SessionInfo { epoch: self.epoch, remote_addr: self.remote_addr.clone() }
    }
}

/// Handle-free view of the live session, for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Epoch of the attempt or connection.
    pub epoch: Epoch,
    /// Remote address. While connecting this is the target as typed.
    pub remote_addr: String,
}
