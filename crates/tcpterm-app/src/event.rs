//! State machine input events.
//!
//! This module defines [`Event`], everything that drives the
//! [`crate::StateMachine`].
//!
//! Events originate from two distinct sources:
//! - User intents from input capture (submit target, submit message, close,
//!   cancel).
//! - Completions of [`crate::Command`]s from the connection manager. These
//!   carry the epoch they were issued against and, when the operation still
//!   owns a socket, the [`Session`] itself so ownership returns to the state
//!   machine.

use crate::{ConnectionError, Epoch, Session};

/// Events processed by the state machine.
#[derive(Debug)]
pub enum Event<H> {
    /// Connect succeeded.
    Connected {
        /// The new session.
        session: Session<H>,
    },

    /// An operation failed.
    Failed {
        /// Epoch the operation was issued against.
        epoch: Epoch,
        /// What went wrong.
        error: ConnectionError,
        /// Session handed back by a failed send. `None` for connect and
        /// close failures.
        session: Option<Session<H>>,
    },

    /// A send completed with a reply.
    Received {
        /// Session handed back by the send.
        session: Session<H>,
        /// Reply bytes, at most the manager's reply capacity.
        bytes: Vec<u8>,
    },

    /// A close completed and the socket was released.
    Closed {
        /// Epoch of the closed session.
        epoch: Epoch,
    },

    /// User submitted a target address.
    UserSubmitTarget(String),

    /// User submitted a message.
    UserSubmitMessage(String),

    /// User asked to close the current connection.
    UserRequestClose,

    /// User asked to quit.
    UserCancel,
}

impl<H> Event<H> {
    /// Epoch this event completes. `None` for user events.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            Self::Connected { session } | Self::Received { session, .. } => Some(session.epoch()),
            Self::Failed { epoch, .. } | Self::Closed { epoch } => Some(*epoch),
            Self::UserSubmitTarget(_)
            | Self::UserSubmitMessage(_)
            | Self::UserRequestClose
            | Self::UserCancel => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Failed { .. } => "failed",
            Self::Received { .. } => "received",
            Self::Closed { .. } => "closed",
            Self::UserSubmitTarget(_) => "submit-target",
            Self::UserSubmitMessage(_) => "submit-message",
            Self::UserRequestClose => "request-close",
            Self::UserCancel => "cancel",
        }
    }
}
