//! Echo server for tcpterm
//!
//! Writes every byte a client sends straight back to it, which is the
//! simplest peer the tcpterm client can talk to. Each accepted socket gets
//! its own task; a client is dropped as soon as it reaches end of stream or
//! its socket errors.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;

use std::net::{AddrParseError, SocketAddr};

pub use error::EchoError;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpSocket, TcpStream},
};

/// Address the server listens on unless told otherwise.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Pending connections the listener queues before refusing.
pub const DEFAULT_BACKLOG: u32 = 3;

/// Bytes read from a client per echo.
pub const READ_BUFFER_SIZE: usize = 8192;

/// Echo server configuration.
#[derive(Debug, Clone)]
pub struct EchoConfig {
    /// `ip:port` to listen on
    pub bind_address: String,
    /// Listen backlog
    pub backlog: u32,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_BIND_ADDRESS.to_string(), backlog: DEFAULT_BACKLOG }
    }
}

/// A bound echo server.
pub struct EchoServer {
    listener: TcpListener,
}

impl EchoServer {
    /// Create the listening socket.
    ///
    /// The address is reusable right after a previous server exits. Must be
    /// called inside a tokio runtime.
    pub fn bind(config: &EchoConfig) -> Result<Self, EchoError> {
        let address: SocketAddr = config.bind_address.parse().map_err(|e: AddrParseError| {
            let address = config.bind_address.clone();
            EchoError::InvalidAddress { address, reason: e.to_string() }
        })?;

        let listener = listen(address, config.backlog)
            .map_err(|source| EchoError::Listen { address, source })?;

        tracing::info!(%address, backlog = config.backlog, "echo server bound");
        Ok(Self { listener })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, EchoError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients forever, echoing each on its own task.
    pub async fn run(self) -> Result<(), EchoError> {
        tracing::info!("echo server listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::info!(%peer, "client accepted");
                    tokio::spawn(echo(stream, peer));
                },
                Err(e) => {
                    tracing::error!("accept error: {}", e);
                },
            }
        }
    }
}

fn listen(address: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
    let socket = if address.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
    socket.set_reuseaddr(true)?;
    socket.bind(address)?;
    socket.listen(backlog)
}

/// Echo one client until it hangs up.
async fn echo(mut stream: TcpStream, peer: SocketAddr) {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = match stream.read(&mut buffer).await {
            Ok(0) => {
                tracing::info!(%peer, "client closed");
                break;
            },
            Ok(read) => read,
            Err(e) => {
                tracing::debug!(%peer, error = %e, "read error");
                break;
            },
        };

        tracing::debug!(%peer, bytes = read, "echo");
        if let Err(e) = stream.write_all(&buffer[..read]).await {
            tracing::debug!(%peer, error = %e, "write error");
            break;
        }
    }
}
