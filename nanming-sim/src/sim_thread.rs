//! Simulation thread: the single writer of the simulation state.
//!
//! Runs `step_world` on a wall-clock timer in its own thread and serializes
//! every command through the same mailbox, so ticks, commands and event
//! resolutions never overlap.

use crate::RunnerError;
use nanming_data::Catalog;
use nanming_sim_core::{
    apply_command, step_world, ActionError, Command, ObserverRegistry, SimConfig, SimMetrics,
    SimState, Snapshot,
};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type CommandReply = Sender<Result<Arc<SimState>, ActionError>>;

/// Messages sent from the owner to the simulation thread.
#[derive(Debug)]
pub enum SimControl {
    /// Start the settlement timer.
    Start,
    /// Stop the settlement timer. No further ticks fire until `Start`.
    Stop,
    /// Apply a command and reply with the new snapshot or the rejection.
    Apply(Command, CommandReply),
    /// Reply with the current snapshot.
    Snapshot(Sender<Arc<SimState>>),
    /// Shut down the simulation thread.
    Shutdown,
}

/// Events sent from the simulation thread to the owner.
#[derive(Debug, Clone)]
pub enum SimEvent {
    /// A month has been settled.
    Tick { state: Arc<SimState>, tick: u64 },
    /// A narrative event became pending; ticks stop until it is resolved.
    EventPending(String),
    /// Simulation thread has shut down.
    Shutdown,
}

/// Handle to the simulation thread.
pub struct SimHandle {
    pub control_tx: Sender<SimControl>,
    pub event_rx: Receiver<SimEvent>,
    pub thread: JoinHandle<SimMetrics>,
}

impl SimHandle {
    pub fn start(&self) {
        let _ = self.control_tx.send(SimControl::Start);
    }

    pub fn stop(&self) {
        let _ = self.control_tx.send(SimControl::Stop);
    }

    /// Apply a command on the simulation thread and wait for the outcome.
    pub fn apply(&self, cmd: Command) -> Result<Arc<SimState>, RunnerError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.control_tx
            .send(SimControl::Apply(cmd, reply_tx))
            .map_err(|_| RunnerError::Disconnected)?;
        let outcome = reply_rx.recv().map_err(|_| RunnerError::Disconnected)?;
        Ok(outcome?)
    }

    /// Current snapshot, read through the mailbox.
    pub fn snapshot(&self) -> Result<Arc<SimState>, RunnerError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.control_tx
            .send(SimControl::Snapshot(reply_tx))
            .map_err(|_| RunnerError::Disconnected)?;
        reply_rx.recv().map_err(|_| RunnerError::Disconnected)
    }

    pub fn shutdown(&self) {
        let _ = self.control_tx.send(SimControl::Shutdown);
    }

    /// Polls for events without blocking.
    pub fn poll_events(&self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the thread to exit and collect its run metrics.
    pub fn join(self) -> Result<SimMetrics, RunnerError> {
        self.thread.join().map_err(|_| RunnerError::Panicked)
    }
}

/// Spawns the simulation thread.
///
/// The timer starts stopped; send [`SimControl::Start`] to begin ticking.
pub fn spawn_sim_thread(
    initial_state: SimState,
    catalog: Catalog,
    config: SimConfig,
    observers: ObserverRegistry,
) -> SimHandle {
    let (control_tx, control_rx) = mpsc::channel::<SimControl>();
    let (event_tx, event_rx) = mpsc::channel::<SimEvent>();

    let thread = thread::Builder::new()
        .name("sim".to_string())
        .spawn(move || {
            let mut sim = SimThread {
                state: Arc::new(initial_state),
                catalog,
                config,
                observers,
                metrics: SimMetrics::default(),
                event_tx,
                running: false,
                timer_anchor: Instant::now(),
            };
            sim.run(control_rx);
            sim.metrics
        })
        .expect("Failed to spawn sim thread");

    SimHandle {
        control_tx,
        event_rx,
        thread,
    }
}

struct SimThread {
    state: Arc<SimState>,
    catalog: Catalog,
    config: SimConfig,
    observers: ObserverRegistry,
    metrics: SimMetrics,
    event_tx: Sender<SimEvent>,
    /// Timer lifecycle, set by Start/Stop.
    running: bool,
    /// Start of the current tick interval.
    timer_anchor: Instant,
}

impl SimThread {
    fn run(&mut self, control_rx: Receiver<SimControl>) {
        loop {
            let message = match self.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match control_rx.recv_timeout(wait) {
                        Ok(msg) => Some(msg),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => Some(SimControl::Shutdown),
                    }
                }
                // Nothing can tick until a message arrives.
                None => Some(control_rx.recv().unwrap_or(SimControl::Shutdown)),
            };

            match message {
                None => self.tick(),
                Some(msg) => {
                    if self.handle(msg).is_break() {
                        return;
                    }
                }
            }
        }
    }

    /// When the next tick is due, or `None` while the timer is stopped or gated.
    fn next_deadline(&self) -> Option<Instant> {
        (self.running && !self.state.is_gated()).then(|| self.timer_anchor + self.interval())
    }

    fn interval(&self) -> Duration {
        self.config.tick_interval
    }

    fn handle(&mut self, msg: SimControl) -> ControlFlow<()> {
        match msg {
            SimControl::Start => {
                if !self.running {
                    log::debug!("Settlement timer started");
                }
                self.running = true;
                self.timer_anchor = Instant::now();
            }
            SimControl::Stop => {
                log::debug!("Settlement timer stopped");
                self.running = false;
            }
            SimControl::Apply(cmd, reply) => {
                let result = self.apply(&cmd);
                let _ = reply.send(result);
            }
            SimControl::Snapshot(reply) => {
                let _ = reply.send(Arc::clone(&self.state));
            }
            SimControl::Shutdown => {
                log::info!("Sim thread shutting down");
                self.observers.shutdown();
                let _ = self.event_tx.send(SimEvent::Shutdown);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn apply(&mut self, cmd: &Command) -> Result<Arc<SimState>, ActionError> {
        match apply_command(&self.state, cmd) {
            Ok(next) => {
                self.metrics.commands_applied += 1;
                let was_gated = self.state.is_gated();
                self.state = Arc::new(next);
                if was_gated && !self.state.is_gated() {
                    // The interval spent gated does not count toward the next tick.
                    self.timer_anchor = Instant::now();
                }
                self.notify();
                Ok(Arc::clone(&self.state))
            }
            Err(e) => {
                self.metrics.commands_rejected += 1;
                if e.is_contract_violation() {
                    log::warn!("Rejected {:?}: {}", cmd, e);
                } else {
                    log::info!("Refused {:?}: {}", cmd, e);
                }
                Err(e)
            }
        }
    }

    fn tick(&mut self) {
        let next = step_world(
            &self.state,
            &self.catalog,
            &self.config,
            Some(&mut self.metrics),
        );
        self.state = Arc::new(next);
        self.timer_anchor = Instant::now();

        let tick = self.state.tick;
        let _ = self.event_tx.send(SimEvent::Tick {
            state: Arc::clone(&self.state),
            tick,
        });
        if let Some(event) = &self.state.pending_event {
            let _ = self.event_tx.send(SimEvent::EventPending(event.id.clone()));
        }
        self.notify();
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let tick = self.state.tick;
        let checksum = if self.config.should_checksum(tick) {
            self.state.checksum()
        } else {
            0
        };
        self.observers
            .notify(&Snapshot::from_arc(Arc::clone(&self.state), tick, checksum));
    }
}
