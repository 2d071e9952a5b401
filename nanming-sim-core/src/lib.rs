//! # Southern Ming Simulation Core
//!
//! Deterministic monthly settlement engine for the Southern Ming court.
//!
//! This crate implements the core loop: state → commands → state transitions.
//! Every transition produces a fresh immutable [`SimState`] snapshot; nothing
//! is mutated in place once published.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │   Player    │────▶│   Command    │────▶│ apply_command │
//! │ (UI / CLI)  │     │ (intents)    │     │ (pure fn)     │
//! └─────────────┘     └──────────────┘     └───────┬───────┘
//!                                                  │
//! ┌─────────────┐     ┌──────────────┐     ┌───────▼───────┐
//! │   Timer     │────▶│  step_world  │────▶│   SimState    │
//! │ (runner)    │     │ (pure fn)    │     │ (new snapshot)│
//! └─────────────┘     └──────────────┘     └───────┬───────┘
//!                                                  │
//!                     ┌──────────────┐             │
//!                     │  Observers   │◀────────────┘
//!                     │  (side fx)   │
//!                     └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SimState`] | Complete simulation state (treasury, provinces, army, events) |
//! | [`Command`] | Player intents (tax edits, pay scale, recruitment, event choices) |
//! | [`step_world`] | One monthly tick: `(state, catalog, config) -> state` |
//! | [`apply_command`] | One command: `(state, command) -> Result<state, ActionError>` |
//! | [`SimObserver`] | Trait for observing state changes (journal, console) |
//!
//! ## Observers
//!
//! Side effects are isolated to the observer layer:
//! - [`EventLogObserver`]: JSONL chronicle of notable transitions
//! - [`ConsoleObserver`]: one log line per settled month
//! - [`SimMetrics`]: performance and run statistics

pub mod config;
pub mod fixed;
pub mod init;
pub mod input;
pub mod metrics;
pub mod observer;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;

pub use config::SimConfig;
pub use fixed::{Fixed, MonthlyAccrual};
pub use init::initial_state;
pub use input::Command;
pub use metrics::SimMetrics;
pub use observer::console::ConsoleObserver;
pub use observer::event_log::{EventLogObserver, JournalEvent};
pub use observer::{ObserverConfig, ObserverError, ObserverRegistry, SimObserver, Snapshot};
pub use state::{CalendarDate, PayScale, Province, SimState, Tab, TroopCategory};
pub use step::{apply_command, step_world, ActionError};
pub use systems::{ExpenseModel, SettlementReport};
