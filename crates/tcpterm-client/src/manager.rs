//! Tokio TCP implementation of [`ConnectionManager`].
//!
//! Provides [`TcpConnectionManager`], which performs the raw byte exchange:
//! one write, then one bounded read. There is no framing, so a reply longer
//! than the reply buffer is truncated and the remainder is left unread on
//! the socket.

use std::{future::Future, io, time::Duration};

use tcpterm_app::{ConnectError, ConnectionManager, Epoch, Event, IoError, Session};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};

use crate::ManagerConfig;

/// Connection manager over plain TCP.
#[derive(Debug, Clone, Default)]
pub struct TcpConnectionManager {
    config: ManagerConfig,
}

impl TcpConnectionManager {
    /// Create a manager with the given configuration.
    ///
    /// A zero `reply_capacity` is raised to one byte. An empty read buffer
    /// cannot tell a reply apart from end of stream.
    pub fn new(mut config: ManagerConfig) -> Self {
        config.reply_capacity = config.reply_capacity.max(1);
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Validate, resolve and dial `target` within the connect timeout.
    async fn dial(&self, target: &str) -> Result<TcpStream, ConnectError> {
        let (host, port) = parse_target(target)?;
        let timeout = self.config.connect_timeout;
        dial_within(target, timeout, TcpStream::connect((host, port))).await
    }
}

/// Await `dialing`, giving up once `timeout` has elapsed.
async fn dial_within<F>(
    target: &str,
    timeout: Duration,
    dialing: F,
) -> Result<TcpStream, ConnectError>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    match tokio::time::timeout(timeout, dialing).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => {
            Err(ConnectError::Dial { target: target.to_string(), message: e.to_string() })
        },
        Err(_) => Err(ConnectError::Timeout { target: target.to_string(), after: timeout }),
    }
}

/// Turn a dial result into the completion reported for `epoch`.
fn dial_outcome(
    epoch: Epoch,
    target: &str,
    dialed: Result<TcpStream, ConnectError>,
) -> Event<TcpStream> {
    match dialed {
        Ok(stream) => {
            let remote = stream.peer_addr().map_or_else(|_| target.to_string(), |a| a.to_string());
            tracing::info!(%epoch, %remote, "dialed");
            Event::Connected { session: Session::new(epoch, remote, stream) }
        },
        Err(error) => {
            tracing::warn!(%epoch, %error, "dial failed");
            Event::Failed { epoch, error: error.into(), session: None }
        },
    }
}

impl ConnectionManager for TcpConnectionManager {
    type Handle = TcpStream;

    async fn connect(&self, epoch: Epoch, target: String) -> Event<TcpStream> {
        let dialed = self.dial(&target).await;
        dial_outcome(epoch, &target, dialed)
    }

    async fn send(&self, mut session: Session<TcpStream>, payload: Vec<u8>) -> Event<TcpStream> {
        let epoch = session.epoch();
        let capacity = self.config().reply_capacity;
        match exchange(session.handle_mut(), &payload, capacity).await {
            Ok(bytes) => {
                if bytes.len() == capacity {
                    tracing::debug!(%epoch, "reply filled the buffer, may be truncated");
                }
                Event::Received { session, bytes }
            },
            Err(error) => {
                tracing::warn!(%epoch, %error, "send failed");
                Event::Failed { epoch, error: error.into(), session: Some(session) }
            },
        }
    }

    async fn close(&self, session: Session<TcpStream>) -> Event<TcpStream> {
        let epoch = session.epoch();
        let mut stream = session.into_handle();

        match stream.shutdown().await {
            Ok(()) => Event::Closed { epoch },
            // Peer already went away; the handle is released all the same.
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Event::Closed { epoch },
            Err(e) => {
                tracing::warn!(%epoch, error = %e, "close failed");
                Event::Failed { epoch, error: IoError::Close(e.to_string()).into(), session: None }
            },
        }
    }
}

/// Write `payload` fully, then perform a single read of at most `capacity`
/// bytes.
///
/// A zero `capacity` reads one byte, so an empty buffer is never mistaken
/// for end of stream.
///
/// # Errors
///
/// - [`IoError::Write`] if the write or flush fails
/// - [`IoError::Read`] if the read fails (including reset by peer)
/// - [`IoError::ConnectionClosed`] if the peer closed before replying
pub async fn exchange<S>(
    stream: &mut S,
    payload: &[u8],
    capacity: usize,
) -> Result<Vec<u8>, IoError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(payload).await.map_err(|e| IoError::Write(e.to_string()))?;
    stream.flush().await.map_err(|e| IoError::Write(e.to_string()))?;

    let mut reply = vec![0u8; capacity.max(1)];
    let read = stream.read(&mut reply).await.map_err(|e| IoError::Read(e.to_string()))?;
    if read == 0 {
        return Err(IoError::ConnectionClosed);
    }

    reply.truncate(read);
    Ok(reply)
}

/// Split a `host:port` target.
///
/// Brackets around an IPv6 host are removed. No resolution happens here.
///
/// # Errors
///
/// Returns [`ConnectError::InvalidAddress`] if the port is missing or not a
/// valid non-zero port, or the host is empty.
pub fn parse_target(target: &str) -> Result<(&str, u16), ConnectError> {
    let invalid = |reason: &str| ConnectError::InvalidAddress {
        target: target.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = target.rsplit_once(':').ok_or_else(|| invalid("expected host:port"))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(invalid("missing host"));
    }

    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid("port must be between 1 and 65535")),
        Ok(port) => Ok((host, port)),
    }
}
