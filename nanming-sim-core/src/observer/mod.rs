//! Observer pattern for simulation state inspection.
//!
//! Observers receive immutable snapshots wrapped in `Arc` and cannot affect
//! the simulation. Cloning a `SimState` is O(1) thanks to the `im`
//! collections, so handing every observer the same snapshot is cheap.
//!
//! # Architecture
//!
//! ```text
//! SimObserver trait
//!        │
//!        ├── ConsoleObserver  (one log line per settled month)
//!        └── EventLogObserver (JSONL journal of notable transitions)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ObserverRegistry::new();
//! registry.register(Box::new(ConsoleObserver::new()));
//!
//! // In the simulation loop, after step_world:
//! let snapshot = Snapshot::new(state.clone(), state.tick, state.checksum());
//! registry.notify(&snapshot);
//! ```

pub mod console;
pub mod event_log;

use crate::state::SimState;
use std::sync::Arc;
use thiserror::Error;

/// Immutable snapshot of simulation state for observers.
#[derive(Clone)]
pub struct Snapshot {
    /// Shared, read-only simulation state
    pub state: Arc<SimState>,
    /// Number of settled months at the time of the snapshot
    pub tick: u64,
    /// State checksum (0 if not computed for this tick)
    pub checksum: u64,
}

impl Snapshot {
    pub fn new(state: SimState, tick: u64, checksum: u64) -> Self {
        Self {
            state: Arc::new(state),
            tick,
            checksum,
        }
    }

    pub fn from_arc(state: Arc<SimState>, tick: u64, checksum: u64) -> Self {
        Self {
            state,
            tick,
            checksum,
        }
    }
}

/// Errors that can occur during observation.
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
    /// Observer channel disconnected (for threaded observers)
    #[error("Observer disconnected")]
    Disconnected,
}

/// Configuration for observer notification frequency.
#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Notify every N ticks (1 = every month, 12 = yearly)
    pub frequency: u32,
    /// Always notify while an event is pending, regardless of frequency
    pub notify_on_event: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            frequency: 1,
            notify_on_event: true,
        }
    }
}

/// Trait for simulation observers.
///
/// Errors returned from `on_tick` are logged by the registry and never stop
/// the simulation.
pub trait SimObserver: Send + Sync {
    /// Called after each notified snapshot.
    fn on_tick(&self, snapshot: &Snapshot) -> Result<(), ObserverError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn config(&self) -> ObserverConfig {
        ObserverConfig::default()
    }

    /// Called when the simulation ends. Flush buffers here.
    fn on_shutdown(&self) {}
}

/// Registry for managing multiple observers.
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SimObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self { observers: vec![] }
    }

    pub fn register(&mut self, observer: Box<dyn SimObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    /// Notify all observers whose frequency matches this snapshot.
    ///
    /// Errors are logged but do not propagate.
    pub fn notify(&self, snapshot: &Snapshot) {
        for observer in &self.observers {
            let config = observer.config();
            let frequency = u64::from(config.frequency.max(1));

            let should_notify = snapshot.tick.is_multiple_of(frequency)
                || (config.notify_on_event && snapshot.state.pending_event.is_some());

            if should_notify {
                if let Err(e) = observer.on_tick(snapshot) {
                    log::warn!("Observer '{}' error: {}", observer.name(), e);
                }
            }
        }
    }

    pub fn shutdown(&self) {
        for observer in &self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
