//! Connection manager trait.
//!
//! The [`ConnectionManager`] executes [`Command`]s as isolated asynchronous
//! operations. Each operation completes with exactly one [`Event`] and never
//! touches UI state; errors are reported only through [`Event::Failed`].

use std::future::Future;

use crate::{Command, Epoch, Event, Session};

/// Executes connect, send and close against a [`Session`].
///
/// # Implementations
///
/// - **TCP**: `tcpterm_client::TcpConnectionManager` over tokio sockets
/// - **Tests**: scripted managers with marker handles
pub trait ConnectionManager: Send + Sync + 'static {
    /// Socket handle owned by a [`Session`].
    type Handle: Send + 'static;

    /// Dial `target` (`host:port`).
    ///
    /// Completes with [`Event::Connected`] carrying a new session for `epoch`,
    /// or [`Event::Failed`] with no session.
    fn connect(
        &self,
        epoch: Epoch,
        target: String,
    ) -> impl Future<Output = Event<Self::Handle>> + Send;

    /// Write `payload`, then read one bounded reply.
    ///
    /// Completes with [`Event::Received`] or [`Event::Failed`]; both hand the
    /// session back.
    fn send(
        &self,
        session: Session<Self::Handle>,
        payload: Vec<u8>,
    ) -> impl Future<Output = Event<Self::Handle>> + Send;

    /// Release the session's socket.
    ///
    /// Completes with [`Event::Closed`] or [`Event::Failed`]. The session is
    /// consumed either way, so a handle is released at most once.
    fn close(
        &self,
        session: Session<Self::Handle>,
    ) -> impl Future<Output = Event<Self::Handle>> + Send;

    /// Run the operation a command describes.
    fn execute(
        &self,
        command: Command<Self::Handle>,
    ) -> impl Future<Output = Event<Self::Handle>> + Send {
        async move {
            match command {
                Command::Connect { epoch, target } => self.connect(epoch, target).await,
                Command::Send { session, payload } => self.send(session, payload).await,
                Command::Close { session } => self.close(session).await,
            }
        }
    }
}
