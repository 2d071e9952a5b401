//! Runners for the Southern Ming settlement simulation.
//!
//! - [`headless`] drives `step_world` directly as fast as possible, resolving
//!   events with a fixed [`ChoicePolicy`].
//! - [`sim_thread`] owns the state on a dedicated thread and ticks it on a
//!   wall-clock timer, the way an interactive front end would.

pub mod headless;
pub mod sim_thread;

pub use headless::{run_headless, ChoicePolicy, HeadlessOptions, HeadlessOutcome};
pub use sim_thread::{spawn_sim_thread, SimControl, SimEvent, SimHandle};

use nanming_sim_core::ActionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Command rejected: {0}")]
    Rejected(#[from] ActionError),
    #[error("Simulation thread disconnected")]
    Disconnected,
    #[error("Simulation thread panicked")]
    Panicked,
}
