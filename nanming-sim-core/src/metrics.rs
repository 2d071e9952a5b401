use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated counters and timings for a simulation run.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct SimMetrics {
    /// Months actually settled.
    pub total_ticks: u64,
    /// Ticks that were no-ops because the clock was paused or an event was pending.
    pub gated_ticks: u64,
    pub commands_applied: u64,
    pub commands_rejected: u64,
    pub events_triggered: u64,
    pub total_time: Duration,
    pub settlement_time: Duration,
    pub event_scan_time: Duration,
}

impl SimMetrics {
    pub fn tick_avg_ms(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / self.total_ticks as f64
        }
    }

    pub fn years_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() == 0.0 {
            0.0
        } else {
            (self.total_ticks as f64 / 12.0) / self.total_time.as_secs_f64()
        }
    }
}
