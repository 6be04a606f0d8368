//! Connection lifecycle state machine.
//!
//! This module defines the [`StateMachine`], which owns the live session and
//! its message log and decides which asynchronous operations to run next. It
//! performs no I/O: it consumes [`Event`]s and produces [`Command`]s for the
//! dispatcher to execute.
//!
//! # Epoch guard
//!
//! Every completion carries the epoch it was issued against. A completion
//! whose epoch does not match the live session is stale and never mutates
//! state. If it still carries a socket, that socket is handed to a `Close`
//! so it is not leaked.
//!
//! # Handle exclusivity
//!
//! The session is moved into each `Send` and returns with its completion.
//! Messages submitted while a send is in flight are logged immediately and
//! queued; the next send is issued when the handle comes back.

use std::collections::VecDeque;

use crate::{
    Command, ConnectError, ConnectionError, ConnectionState, Epoch, Event, MessageLog, Session,
    SessionInfo,
};

/// Connection lifecycle state machine.
///
/// Pure state machine that processes events and produces commands.
/// No I/O dependencies, fully testable with any handle type.
#[derive(Debug)]
pub struct StateMachine<H> {
    /// Current state plus the data owned by it.
    phase: Phase<H>,
    /// Epoch minted for the most recent connect attempt.
    last_epoch: Epoch,
    /// Most recent session-level error, kept for display.
    last_error: Option<ConnectionError>,
}

#[derive(Debug)]
enum Phase<H> {
    NotConnected,
    Connecting { epoch: Epoch, target: String },
    Connected(Live<H>),
    Closed,
}

/// Data owned by the Connected state.
#[derive(Debug)]
struct Live<H> {
    info: SessionInfo,
    /// `None` while lent to an in-flight send.
    session: Option<Session<H>>,
    outbox: VecDeque<Vec<u8>>,
    log: MessageLog,
}

impl<H> Live<H> {
    fn adopt(session: Session<H>) -> Self {
        Self {
            info: session.info(),
            session: Some(session),
            outbox: VecDeque::new(),
            log: MessageLog::new(),
        }
    }

    /// Lend the session to the next queued send, if both are available.
    fn next_send(&mut self) -> Option<Command<H>> {
        if self.session.is_none() {
            return None;
        }
        let payload = self.outbox.pop_front()?;
        let session = self.session.take()?;
        Some(Command::Send { session, payload })
    }

    /// Give up the session, closing the handle if it is held.
    fn release(self) -> Vec<Command<H>> {
        close(self.session)
    }
}

fn close<H>(session: Option<Session<H>>) -> Vec<Command<H>> {
    session.map(|session| Command::Close { session }).into_iter().collect()
}

impl<H> Default for StateMachine<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> StateMachine<H> {
    /// Create a state machine waiting for a target.
    pub fn new() -> Self {
        Self { phase: Phase::NotConnected, last_epoch: Epoch::default(), last_error: None }
    }

    /// Apply one event and return the commands to execute.
    pub fn handle(&mut self, event: Event<H>) -> Vec<Command<H>> {
        let before = self.connection_state();
        let name = event.name();

        if before.is_terminal() {
            tracing::debug!(event = name, "ignoring event after close");
            return Vec::new();
        }

        let commands = match event {
            Event::UserSubmitTarget(target) => self.submit_target(target),
            Event::UserSubmitMessage(message) => self.submit_message(message),
            Event::UserRequestClose => self.request_close(),
            Event::UserCancel => self.cancel(),
            Event::Connected { session } => self.on_connected(session),
            Event::Failed { epoch, error, session } => self.on_failed(epoch, error, session),
            Event::Received { session, bytes } => self.on_received(session, &bytes),
            Event::Closed { epoch } => self.on_closed(epoch),
        };

        let after = self.connection_state();
        if before != after {
            tracing::debug!(event = name, from = %before, to = %after, "transition");
        }
        commands
    }

    fn submit_target(&mut self, target: String) -> Vec<Command<H>> {
        if !matches!(self.phase, Phase::NotConnected) {
            tracing::debug!(state = %self.connection_state(), "ignoring target submission");
            return Vec::new();
        }

        let target = target.trim().to_string();
        if target.is_empty() {
            self.last_error = Some(
                ConnectError::InvalidAddress { target, reason: "target is empty".into() }.into(),
            );
            return Vec::new();
        }

        let epoch = self.last_epoch.next();
        self.last_epoch = epoch;
        self.last_error = None;
        tracing::info!(%epoch, %target, "connecting");

        self.phase = Phase::Connecting { epoch, target: target.clone() };
        vec![Command::Connect { epoch, target }]
    }

    fn submit_message(&mut self, message: String) -> Vec<Command<H>> {
        let Phase::Connected(live) = &mut self.phase else {
            tracing::debug!("ignoring message while not connected");
            return Vec::new();
        };

        live.log.push_sent(message.clone());
        live.outbox.push_back(message.into_bytes());
        live.next_send().into_iter().collect()
    }

    fn request_close(&mut self) -> Vec<Command<H>> {
        match std::mem::replace(&mut self.phase, Phase::NotConnected) {
            Phase::Connected(live) => {
                tracing::info!(epoch = %live.info.epoch, "closing connection");
                live.release()
            },
            Phase::Connecting { epoch, target } => {
                tracing::info!(%epoch, %target, "abandoning connect attempt");
                Vec::new()
            },
            other => {
                self.phase = other;
                Vec::new()
            },
        }
    }

    fn cancel(&mut self) -> Vec<Command<H>> {
        match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Connected(live) => live.release(),
            Phase::NotConnected | Phase::Connecting { .. } | Phase::Closed => Vec::new(),
        }
    }

    fn on_connected(&mut self, session: Session<H>) -> Vec<Command<H>> {
        match &self.phase {
            Phase::Connecting { epoch, .. } if *epoch == session.epoch() => {
                let remote = session.remote_addr();
                tracing::info!(epoch = %session.epoch(), remote, "connected");
                self.phase = Phase::Connected(Live::adopt(session));
                Vec::new()
            },
            _ => {
                tracing::warn!(epoch = %session.epoch(), "closing stale connection");
                close(Some(session))
            },
        }
    }

    fn on_failed(
        &mut self,
        epoch: Epoch,
        error: ConnectionError,
        session: Option<Session<H>>,
    ) -> Vec<Command<H>> {
        if self.live_epoch() != Some(epoch) {
            tracing::warn!(%epoch, %error, "dropping stale failure");
            return close(session);
        }

        tracing::warn!(%epoch, %error, "connection failed");
        self.last_error = Some(error);

        match std::mem::replace(&mut self.phase, Phase::NotConnected) {
            Phase::Connected(mut live) => {
                if session.is_some() {
                    live.session = session;
                }
                live.release()
            },
            Phase::NotConnected | Phase::Connecting { .. } | Phase::Closed => close(session),
        }
    }

    fn on_received(&mut self, session: Session<H>, bytes: &[u8]) -> Vec<Command<H>> {
        match &mut self.phase {
            Phase::Connected(live) if live.info.epoch == session.epoch() => {
                live.log.push_received(bytes);
                live.session = Some(session);
                live.next_send().into_iter().collect()
            },
            _ => {
                tracing::warn!(epoch = %session.epoch(), "dropping stale reply");
                close(Some(session))
            },
        }
    }

    fn on_closed(&mut self, epoch: Epoch) -> Vec<Command<H>> {
        if self.live_epoch() != Some(epoch) {
            tracing::debug!(%epoch, "connection released");
            return Vec::new();
        }

        tracing::warn!(%epoch, "live session closed underneath us");
        match std::mem::replace(&mut self.phase, Phase::NotConnected) {
            Phase::Connected(live) => live.release(),
            Phase::NotConnected | Phase::Connecting { .. } | Phase::Closed => Vec::new(),
        }
    }

    fn live_epoch(&self) -> Option<Epoch> {
        match &self.phase {
            Phase::Connecting { epoch, .. } => Some(*epoch),
            Phase::Connected(live) => Some(live.info.epoch),
            Phase::NotConnected | Phase::Closed => None,
        }
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        match self.phase {
            Phase::NotConnected => ConnectionState::NotConnected,
            Phase::Connecting { .. } => ConnectionState::Connecting,
            Phase::Connected(_) => ConnectionState::Connected,
            Phase::Closed => ConnectionState::Closed,
        }
    }

    /// The live session. `Some` exactly while connecting or connected.
    pub fn session(&self) -> Option<SessionInfo> {
        match &self.phase {
            Phase::Connecting { epoch, target } => {
                Some(SessionInfo { epoch: *epoch, remote_addr: target.clone() })
            },
            Phase::Connected(live) => Some(live.info.clone()),
            Phase::NotConnected | Phase::Closed => None,
        }
    }

    /// Target being dialed. `None` unless connecting.
    pub fn target(&self) -> Option<&str> {
        match &self.phase {
            Phase::Connecting { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Message log of the connected session. `None` unless connected.
    pub fn message_log(&self) -> Option<&MessageLog> {
        match &self.phase {
            Phase::Connected(live) => Some(&live.log),
            _ => None,
        }
    }

    /// Most recent error. Cleared when a new attempt starts.
    pub fn last_error(&self) -> Option<&ConnectionError> {
        self.last_error.as_ref()
    }

    /// Epoch minted for the most recent connect attempt.
    pub fn last_epoch(&self) -> Epoch {
        self.last_epoch
    }

    /// Whether a send is in flight on the connected session.
    pub fn is_awaiting_reply(&self) -> bool {
        matches!(&self.phase, Phase::Connected(live) if live.session.is_none())
    }

    /// Number of submitted messages not yet handed to a send.
    pub fn queued_messages(&self) -> usize {
        match &self.phase {
            Phase::Connected(live) => live.outbox.len(),
            _ => 0,
        }
    }

    /// Whether the machine reached its terminal state.
    pub fn is_terminal(&self) -> bool {
        self.connection_state().is_terminal()
    }
}
