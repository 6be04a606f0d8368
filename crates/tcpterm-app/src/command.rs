//! Asynchronous operations requested by the state machine.
//!
//! This module defines [`Command`], the instructions produced by the
//! [`crate::StateMachine`] for a [`crate::ConnectionManager`] to execute.
//! Every command completes with exactly one [`crate::Event`].

use crate::{Epoch, Session};

/// Operations produced by the state machine.
#[derive(Debug)]
pub enum Command<H> {
    /// Dial a target.
    Connect {
        /// Epoch minted for this attempt.
        epoch: Epoch,
        /// Target address (host:port).
        target: String,
    },

    /// Write a payload, then read one bounded reply.
    Send {
        /// Session the payload is sent on. Moved into the operation.
        session: Session<H>,
        /// Raw payload bytes.
        payload: Vec<u8>,
    },

    /// Release a session's socket.
    Close {
        /// Session to close. Consumed by the operation.
        session: Session<H>,
    },
}

impl<H> Command<H> {
    /// Epoch of the session or attempt this command was issued against.
    pub fn epoch(&self) -> Epoch {
        match self {
            Self::Connect { epoch, .. } => *epoch,
            Self::Send { session, .. } | Self::Close { session } => session.epoch(),
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Send { .. } => "send",
            Self::Close { .. } => "close",
        }
    }
}
