//! End-to-end tests against a real loopback listener.
//!
//! Each test drives the state machine by hand, executing its commands with
//! [`TcpConnectionManager`] and feeding the completions back in.

use std::time::Duration;

use tcpterm_app::{
    Command, ConnectError, ConnectionError, ConnectionManager, ConnectionState, Epoch, Event,
    IoError, StateMachine,
};
use tcpterm_client::{ManagerConfig, REPLY_BUFFER_CAPACITY, TcpConnectionManager};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

type Machine = StateMachine<TcpStream>;

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, format!("localhost:{port}"))
}

/// Execute every command and feed its completion back, until quiet.
async fn settle(
    manager: &TcpConnectionManager,
    machine: &mut Machine,
    commands: Vec<Command<TcpStream>>,
) -> usize {
    let mut closes = 0;
    let mut pending = commands;
    while let Some(command) = pending.pop() {
        if matches!(command, Command::Close { .. }) {
            closes += 1;
        }
        let event = tokio::time::timeout(Duration::from_secs(5), manager.execute(command))
            .await
            .expect("command timed out");
        pending.extend(machine.handle(event));
    }
    closes
}

async fn connect(manager: &TcpConnectionManager, machine: &mut Machine, target: &str) {
    let commands = machine.handle(Event::UserSubmitTarget(target.to_string()));
    settle(manager, machine, commands).await;
}

#[tokio::test]
async fn connects_to_listening_server() {
    let (listener, target) = listener().await;
    let server = tokio::spawn(async move { listener.accept().await.map(|(stream, _)| stream) });

    let manager = TcpConnectionManager::default();
    let mut machine = Machine::new();
    connect(&manager, &mut machine, &target).await;

    assert_eq!(machine.connection_state(), ConnectionState::Connected);
    assert_eq!(machine.last_epoch(), Epoch::new(1));
    assert!(machine.message_log().is_some_and(|log| log.is_empty()));
    assert!(machine.last_error().is_none());
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_target_is_reported() {
    let manager = TcpConnectionManager::default();
    let mut machine = Machine::new();
    connect(&manager, &mut machine, "not-a-host").await;

    assert_eq!(machine.connection_state(), ConnectionState::NotConnected);
    assert!(machine.session().is_none());
    assert!(matches!(
        machine.last_error(),
        Some(ConnectionError::Connect(ConnectError::InvalidAddress { .. }))
    ));
}

#[tokio::test]
async fn refused_dial_is_reported() {
    let (listener, target) = listener().await;
    drop(listener);

    let manager = TcpConnectionManager::default();
    let mut machine = Machine::new();
    connect(&manager, &mut machine, &target).await;

    assert_eq!(machine.connection_state(), ConnectionState::NotConnected);
    assert!(matches!(
        machine.last_error(),
        Some(ConnectionError::Connect(ConnectError::Dial { .. }))
    ));
}

#[tokio::test]
async fn message_and_reply_are_logged() {
    let (listener, target) = listener().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await?;
        assert_eq!(&buf, b"ping");
        stream.write_all(b"pong").await?;
        // Hold the socket until the client hangs up.
        let _ = stream.read(&mut buf).await;
        std::io::Result::Ok(())
    });

    let manager = TcpConnectionManager::default();
    let mut machine = Machine::new();
    connect(&manager, &mut machine, &target).await;

    let commands = machine.handle(Event::UserSubmitMessage("ping".into()));
    settle(&manager, &mut machine, commands).await;

    let lines = machine.message_log().map(|log| log.lines());
    assert_eq!(lines, Some(vec!["you: ping".to_string(), "server: pong".to_string()]));
    assert_eq!(machine.connection_state(), ConnectionState::Connected);

    let commands = machine.handle(Event::UserCancel);
    let closes = settle(&manager, &mut machine, commands).await;
    assert_eq!(closes, 1);
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn peer_hangup_returns_to_not_connected_and_closes_once() {
    let (listener, target) = listener().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = [0u8; 16];
        let _ = stream.read(&mut buf).await?;
        std::io::Result::Ok(())
    });

    let manager = TcpConnectionManager::default();
    let mut machine = Machine::new();
    connect(&manager, &mut machine, &target).await;

    let commands = machine.handle(Event::UserSubmitMessage("hello".into()));
    let closes = settle(&manager, &mut machine, commands).await;

    assert_eq!(closes, 1);
    assert_eq!(machine.connection_state(), ConnectionState::NotConnected);
    assert!(machine.session().is_none());
    assert!(matches!(
        machine.last_error(),
        Some(ConnectionError::Io(IoError::ConnectionClosed | IoError::Read(_)))
    ));
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn long_reply_is_bounded() {
    let (listener, target) = listener().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await?;
        stream.write_all(&[b'z'; 1000]).await?;
        let _ = stream.read(&mut buf).await;
        std::io::Result::Ok(())
    });

    let manager = TcpConnectionManager::new(ManagerConfig::default());
    let mut machine = Machine::new();
    connect(&manager, &mut machine, &target).await;

    let commands = machine.handle(Event::UserSubmitMessage("long".into()));
    settle(&manager, &mut machine, commands).await;

    let log = machine.message_log().expect("still connected");
    let reply = &log.entries()[1];
    assert!(!reply.content.is_empty());
    assert!(reply.content.len() <= REPLY_BUFFER_CAPACITY);

    let commands = machine.handle(Event::UserCancel);
    settle(&manager, &mut machine, commands).await;
    server.await.unwrap().unwrap();
}
