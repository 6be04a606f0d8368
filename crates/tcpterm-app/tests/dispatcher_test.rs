//! Dispatcher tests with a scripted driver and an in-memory manager.
//!
//! # Oracle Pattern
//!
//! The driver records what every render observed. Tests end with oracle
//! checks on those observations and on what the manager was asked to do.

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tcpterm_app::{
    ConnectError, ConnectionManager, ConnectionState, Dispatcher, Driver, Epoch, Event, Input,
    IoError, Session, StateMachine,
};

/// What renders have observed so far.
#[derive(Debug, Default)]
struct Observed {
    state: Option<ConnectionState>,
    log: Vec<String>,
    error: Option<String>,
    renders: usize,
}

/// One scripted user input, released once `ready` holds.
struct Step {
    ready: fn(&Observed) -> bool,
    event: Event<u32>,
}

/// Driver that replays a script, then quits.
#[derive(Default)]
struct ScriptedDriver {
    steps: VecDeque<Step>,
    observed: Observed,
}

impl ScriptedDriver {
    fn step(mut self, ready: fn(&Observed) -> bool, event: Event<u32>) -> Self {
        self.steps.push_back(Step { ready, event });
        self
    }
}

fn not_connected(observed: &Observed) -> bool {
    observed.state == Some(ConnectionState::NotConnected)
}

fn connected(observed: &Observed) -> bool {
    observed.state == Some(ConnectionState::Connected)
}

fn submit_target(target: &str) -> Event<u32> {
    Event::UserSubmitTarget(target.to_string())
}

impl Driver<u32> for ScriptedDriver {
    type Error = Infallible;

    async fn next_input(&mut self, _state: ConnectionState) -> Result<Input<u32>, Infallible> {
        let ready = self.steps.front().map(|step| (step.ready)(&self.observed));
        match ready {
            Some(true) => {
                Ok(self.steps.pop_front().map_or(Input::Redraw, |step| Input::Event(step.event)))
            },
            // Wait for a completion to change what renders observe.
            Some(false) => std::future::pending().await,
            None => Ok(Input::Event(Event::UserCancel)),
        }
    }

    fn render(&mut self, machine: &StateMachine<u32>) -> Result<(), Infallible> {
        self.observed.state = Some(machine.connection_state());
        self.observed.error = machine.last_error().map(ToString::to_string);
        if let Some(log) = machine.message_log() {
            self.observed.log = log.lines();
        }
        self.observed.renders += 1;
        Ok(())
    }
}

/// Manager that answers from memory.
///
/// Targets starting with `refused` fail to connect. The payload `drop`
/// behaves like a peer that hangs up before replying; `hello` gets `hi`;
/// anything else is echoed.
#[derive(Default)]
struct MemoryManager {
    closes: Arc<AtomicUsize>,
}

impl ConnectionManager for MemoryManager {
    type Handle = u32;

    async fn connect(&self, epoch: Epoch, target: String) -> Event<u32> {
        if target.starts_with("refused") {
            let error = ConnectError::Dial { target, message: "connection refused".into() };
            return Event::Failed { epoch, error: error.into(), session: None };
        }
        Event::Connected { session: Session::new(epoch, target, 1) }
    }

    async fn send(&self, session: Session<u32>, payload: Vec<u8>) -> Event<u32> {
        match payload.as_slice() {
            b"hello" => Event::Received { session, bytes: b"hi".to_vec() },
            b"drop" => Event::Failed {
                epoch: session.epoch(),
                error: IoError::ConnectionClosed.into(),
                session: Some(session),
            },
            _ => Event::Received { session, bytes: payload },
        }
    }

    async fn close(&self, session: Session<u32>) -> Event<u32> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Event::Closed { epoch: session.epoch() }
    }
}

async fn run(
    driver: ScriptedDriver,
) -> (Dispatcher<ScriptedDriver, MemoryManager>, Arc<AtomicUsize>) {
    let manager = MemoryManager::default();
    let closes = Arc::clone(&manager.closes);
    let mut dispatcher = Dispatcher::new(driver, manager);

    let result = tokio::time::timeout(Duration::from_secs(5), dispatcher.run()).await;
    assert!(matches!(result, Ok(Ok(()))), "dispatcher did not finish");
    (dispatcher, closes)
}

/// Let spawned close tasks finish after the loop has stopped.
async fn wait_for_closes(closes: &AtomicUsize, expected: usize) {
    for _ in 0..100 {
        if closes.load(Ordering::SeqCst) >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(closes.load(Ordering::SeqCst), expected);
}

#[tokio::test]
async fn message_and_reply_are_logged_in_order() {
    let driver = ScriptedDriver::default()
        .step(not_connected, submit_target("localhost:9000"))
        .step(connected, Event::UserSubmitMessage("hello".into()))
        .step(|o| o.log.len() == 2, Event::UserCancel);

    let (mut dispatcher, closes) = run(driver).await;

    assert_eq!(dispatcher.machine().connection_state(), ConnectionState::Closed);
    assert_eq!(dispatcher.driver_mut().observed.log, ["you: hello", "server: hi"]);
    wait_for_closes(&closes, 1).await;
}

#[tokio::test]
async fn refused_connect_returns_to_not_connected() {
    let driver = ScriptedDriver::default()
        .step(not_connected, submit_target("refused:1"))
        .step(|o| o.error.is_some(), Event::UserCancel);

    let (mut dispatcher, closes) = run(driver).await;

    let observed = &dispatcher.driver_mut().observed;
    assert!(observed.error.as_deref().is_some_and(|e| e.contains("connection refused")));
    assert!(observed.renders >= 3);
    assert_eq!(closes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn peer_hangup_disconnects_and_closes_once() {
    let driver = ScriptedDriver::default()
        .step(not_connected, submit_target("localhost:9000"))
        .step(connected, Event::UserSubmitMessage("drop".into()))
        .step(
            |o| o.state == Some(ConnectionState::NotConnected) && o.error.is_some(),
            Event::UserCancel,
        );

    let (dispatcher, closes) = run(driver).await;

    assert!(dispatcher.machine().is_terminal());
    wait_for_closes(&closes, 1).await;
}

#[tokio::test]
async fn user_close_then_reconnect_uses_new_epoch() {
    let driver = ScriptedDriver::default()
        .step(not_connected, submit_target("localhost:9000"))
        .step(connected, Event::UserRequestClose)
        .step(not_connected, submit_target("localhost:9001"))
        .step(connected, Event::UserCancel);

    let (dispatcher, closes) = run(driver).await;

    assert_eq!(dispatcher.machine().last_epoch(), Epoch::new(2));
    wait_for_closes(&closes, 2).await;
}
