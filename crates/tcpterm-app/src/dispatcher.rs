//! Single-threaded event dispatcher.
//!
//! The Dispatcher drives the application event loop, coordinating between:
//! - [`StateMachine`]: connection lifecycle
//! - [`ConnectionManager`]: async operations, one spawned task per command
//! - [`Driver`]: platform-specific input and rendering
//!
//! All state mutation happens on the dispatcher's task. Spawned operations
//! report back through a single inbound queue, and every event, whatever its
//! source, is applied exactly once in the order it is received.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{Command, ConnectionManager, Driver, Event, Input, StateMachine};

/// Generic dispatcher that orchestrates StateMachine, ConnectionManager and
/// Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific input/rendering driver
/// - `M`: Connection manager executing commands
pub struct Dispatcher<D, M>
where
    M: ConnectionManager,
{
    driver: D,
    manager: Arc<M>,
    machine: StateMachine<M::Handle>,
    completions_tx: mpsc::UnboundedSender<Event<M::Handle>>,
    completions_rx: mpsc::UnboundedReceiver<Event<M::Handle>>,
}

impl<D, M> Dispatcher<D, M>
where
    M: ConnectionManager,
    D: Driver<M::Handle>,
{
    /// Create a dispatcher with a fresh state machine.
    pub fn new(driver: D, manager: M) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            driver,
            manager: Arc::new(manager),
            machine: StateMachine::new(),
            completions_tx,
            completions_rx,
        }
    }

    /// Run the event loop until the state machine reaches its terminal state.
    ///
    /// Each cycle waits for either a user input or an operation completion,
    /// applies it, spawns the resulting commands and renders. Operations
    /// still in flight when the loop ends are left to finish unobserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or render.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.machine)?;

        while !self.machine.is_terminal() {
            let state = self.machine.connection_state();

            let next = tokio::select! {
                biased;

                Some(event) = self.completions_rx.recv() => Some(event),

                input = self.driver.next_input(state) => match input? {
                    Input::Event(event) => Some(event),
                    Input::Redraw => None,
                },
            };

            if let Some(event) = next {
                self.dispatch(event);
            }
            self.driver.render(&self.machine)?;
        }

        tracing::info!("dispatcher stopped");
        Ok(())
    }

    /// Apply one event and spawn the commands it produces.
    pub fn dispatch(&mut self, event: Event<M::Handle>) {
        for command in self.machine.handle(event) {
            self.spawn(command);
        }
    }

    /// Run a command on its own task. Its completion re-enters through the
    /// inbound queue.
    fn spawn(&self, command: Command<M::Handle>) {
        tracing::debug!(command = command.name(), epoch = %command.epoch(), "spawning");

        let manager = Arc::clone(&self.manager);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = manager.execute(command).await;
            if completions.send(event).is_err() {
                tracing::debug!("completion dropped, dispatcher has stopped");
            }
        });
    }

    /// Get a reference to the state machine.
    pub fn machine(&self) -> &StateMachine<M::Handle> {
        &self.machine
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
