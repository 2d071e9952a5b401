//! Console observer: one summary line per settled month through `log`.

use super::{ObserverConfig, ObserverError, SimObserver, Snapshot};
use crate::fixed::Fixed;
use std::sync::Mutex;

/// Logs the treasury, its month-over-month delta, the standing army and any
/// pending event each time a new month is settled.
pub struct ConsoleObserver {
    /// Tick and treasury of the last line printed
    last: Mutex<Option<(u64, Fixed)>>,
    config: ObserverConfig,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
            config: ObserverConfig {
                frequency: 1,
                notify_on_event: false,
            },
        }
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.config.frequency = frequency;
        self
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats the summary line, or `None` if this tick was already reported.
fn summary_line(snapshot: &Snapshot, last: Option<(u64, Fixed)>) -> Option<String> {
    let state = &snapshot.state;
    let delta = match last {
        Some((tick, _)) if tick == snapshot.tick => return None,
        Some((_, treasury)) => state.treasury - treasury,
        None => Fixed::ZERO,
    };

    let mut line = format!(
        "[{}] treasury {:>9.1} ({:+.1}) | troops {:>6} @ {} | prestige {}",
        state.date,
        state.treasury.to_f64(),
        delta.to_f64(),
        state.total_troops(),
        state.pay_scale,
        state.prestige,
    );
    if let Some(event) = &state.pending_event {
        line.push_str(&format!(" | awaiting decision: {}", event.name));
    }
    Some(line)
}

impl SimObserver for ConsoleObserver {
    fn on_tick(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        let mut last = self
            .last
            .lock()
            .map_err(|_| ObserverError::Render("Lock poisoned".to_string()))?;

        if let Some(line) = summary_line(snapshot, *last) {
            log::info!("{}", line);
            *last = Some((snapshot.tick, snapshot.state.treasury));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ConsoleObserver"
    }

    fn config(&self) -> ObserverConfig {
        self.config.clone()
    }
}
