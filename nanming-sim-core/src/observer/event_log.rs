//! Event log observer for recording the court chronicle as JSONL.
//!
//! Detects notable transitions by comparing each snapshot with the previous
//! one and writes one JSON object per line to any `Write` destination.
//!
//! # Events
//!
//! - `month_settled` - a month was settled (income, expenses, treasury)
//! - `event_triggered` - a narrative event became pending
//! - `event_resolved` - a narrative event was resolved
//! - `troops_recruited` - troops were recruited by command
//! - `pay_scale_changed` - army pay scale changed
//! - `treasury_deficit` - treasury crossed below zero

use super::{ObserverConfig, ObserverError, SimObserver, Snapshot};
use crate::fixed::Fixed;
use crate::state::{PayScale, SimState, TroopCategory};
use crate::step::RECRUITED_ENTRY_PREFIX;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Journal entries, tagged for clean JSONL output:
/// ```json
/// {"type":"event_triggered","tick":1,"date":"1644.5","event_id":"EVENT_01",...}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEvent {
    MonthSettled {
        tick: u64,
        date: String,
        /// Monthly figures in ten-thousands of taels
        income: f64,
        expenses: f64,
        net: f64,
        treasury: f64,
    },
    EventTriggered {
        tick: u64,
        date: String,
        event_id: String,
        name: String,
    },
    EventResolved {
        tick: u64,
        date: String,
        event_id: String,
        /// Chronicle line recording the choice
        #[serde(skip_serializing_if = "Option::is_none")]
        entry: Option<String>,
    },
    TroopsRecruited {
        tick: u64,
        date: String,
        amount: u64,
        total: u64,
    },
    PayScaleChanged {
        tick: u64,
        date: String,
        from: PayScale,
        to: PayScale,
    },
    TreasuryDeficit {
        tick: u64,
        date: String,
        treasury: f64,
    },
}

/// What the previous snapshot looked like, for diffing.
struct EventLogState {
    first_tick: bool,
    tick: u64,
    pending: Option<String>,
    resolved: FxHashSet<String>,
    recruits: u64,
    history_len: usize,
    pay_scale: PayScale,
    treasury: Fixed,
}

impl EventLogState {
    fn new() -> Self {
        Self {
            first_tick: true,
            tick: 0,
            pending: None,
            resolved: FxHashSet::default(),
            recruits: 0,
            history_len: 0,
            pay_scale: PayScale::default(),
            treasury: Fixed::ZERO,
        }
    }

    fn update_from(&mut self, state: &SimState) {
        self.tick = state.tick;
        self.pending = state.pending_event.as_ref().map(|e| e.id.clone());
        self.resolved = state.resolved_event_ids.iter().cloned().collect();
        self.recruits = state.troops(TroopCategory::Recruit);
        self.history_len = state.history.len();
        self.pay_scale = state.pay_scale;
        self.treasury = state.treasury;
        self.first_tick = false;
    }
}

/// Observer that journals simulation transitions as JSONL.
///
/// ```ignore
/// let observer = EventLogObserver::file("chronicle.jsonl")?;
/// registry.register(Box::new(observer));
/// ```
pub struct EventLogObserver {
    writer: Mutex<Box<dyn Write + Send>>,
    state: Mutex<EventLogState>,
    config: ObserverConfig,
}

impl EventLogObserver {
    /// Buffered stdout, for piping into `jq` and friends.
    pub fn stdout() -> Self {
        Self::new(Box::new(BufWriter::new(std::io::stdout())))
    }

    pub fn file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            state: Mutex::new(EventLogState::new()),
            config: ObserverConfig {
                frequency: 1,
                notify_on_event: true,
            },
        }
    }

    fn detect_events(&self, snapshot: &Snapshot, prev: &EventLogState) -> Vec<JournalEvent> {
        let state = &snapshot.state;
        let tick = snapshot.tick;
        let date = state.date.to_string();
        let mut events = Vec::new();

        // 1. Settlement
        if state.tick > prev.tick {
            if let Some(report) = &state.last_settlement {
                events.push(JournalEvent::MonthSettled {
                    tick,
                    date: date.clone(),
                    income: report.income.to_f64(),
                    expenses: report.expenses().to_f64(),
                    net: report.net.to_f64(),
                    treasury: state.treasury.to_f64(),
                });
            }
        }

        // 2. Resolutions, in id order
        for id in state.resolved_event_ids.iter() {
            if !prev.resolved.contains(id) {
                let entry = state
                    .history
                    .last()
                    .filter(|line| line.starts_with('['))
                    .cloned();
                events.push(JournalEvent::EventResolved {
                    tick,
                    date: date.clone(),
                    event_id: id.clone(),
                    entry,
                });
            }
        }

        // 3. Newly pending event
        if let Some(event) = &state.pending_event {
            if prev.pending.as_deref() != Some(event.id.as_str()) {
                events.push(JournalEvent::EventTriggered {
                    tick,
                    date: date.clone(),
                    event_id: event.id.clone(),
                    name: event.name.clone(),
                });
            }
        }

        // 4. Recruitment by command; event impacts on the pool are not journaled
        let recruits = state.troops(TroopCategory::Recruit);
        let recruited = state
            .history
            .iter()
            .skip(prev.history_len)
            .any(|line| line.starts_with(RECRUITED_ENTRY_PREFIX));
        if recruited && recruits > prev.recruits {
            events.push(JournalEvent::TroopsRecruited {
                tick,
                date: date.clone(),
                amount: recruits - prev.recruits,
                total: recruits,
            });
        }

        // 5. Pay scale
        if state.pay_scale != prev.pay_scale {
            events.push(JournalEvent::PayScaleChanged {
                tick,
                date: date.clone(),
                from: prev.pay_scale,
                to: state.pay_scale,
            });
        }

        // 6. Deficit
        if state.treasury.is_negative() && !prev.treasury.is_negative() {
            events.push(JournalEvent::TreasuryDeficit {
                tick,
                date,
                treasury: state.treasury.to_f64(),
            });
        }

        events
    }

    fn write_event(&self, writer: &mut dyn Write, event: &JournalEvent) -> Result<(), ObserverError> {
        serde_json::to_writer(&mut *writer, event)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl SimObserver for EventLogObserver {
    fn on_tick(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ObserverError::Render("EventLogObserver state lock poisoned".into()))?;

        // The first snapshot only seeds the baseline.
        if !state.first_tick {
            let events = self.detect_events(snapshot, &state);

            if !events.is_empty() {
                let mut writer = self.writer.lock().map_err(|_| {
                    ObserverError::Render("EventLogObserver writer lock poisoned".into())
                })?;
                for event in &events {
                    self.write_event(&mut *writer, event)?;
                }
                writer.flush()?;
            }
        }

        state.update_from(&snapshot.state);
        Ok(())
    }

    fn name(&self) -> &str {
        "EventLogObserver"
    }

    fn config(&self) -> ObserverConfig {
        self.config.clone()
    }

    fn on_shutdown(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
