use crate::systems::ExpenseModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Wall-clock time per simulated month when driven by a timer.
    pub tick_interval: Duration,
    pub expense_model: ExpenseModel,
    /// Year the narrative events are anchored to.
    pub event_epoch_year: i32,
    /// Compute checksum every N ticks (0 = disabled).
    ///
    /// Recommended values:
    /// - `1`: Every month
    /// - `12`: Every year
    pub checksum_frequency: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(4),
            expense_model: ExpenseModel::MaintenanceOnly,
            event_epoch_year: nanming_data::defines::calendar::EVENT_EPOCH_YEAR,
            checksum_frequency: 12,
        }
    }
}

impl SimConfig {
    pub fn should_checksum(&self, tick: u64) -> bool {
        self.checksum_frequency != 0 && tick.is_multiple_of(self.checksum_frequency as u64)
    }
}
