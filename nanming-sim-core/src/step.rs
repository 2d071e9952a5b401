use crate::config::SimConfig;
use crate::fixed::Fixed;
use crate::input::Command;
use crate::metrics::SimMetrics;
use crate::state::{PayScale, SimState, TroopCategory};
use crate::systems;
use nanming_data::defines::economy as defines;
use nanming_data::{Catalog, TaxField};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Fixed, available: Fixed },
    #[error("No event is pending resolution")]
    NoPendingEvent,
    #[error("Event '{event}' has no option '{option}'")]
    UnknownOption { event: String, option: String },
    #[error("Recruitment amount must be positive, got {0}")]
    NonPositiveRecruitment(i64),
    #[error("Invalid pay scale '{0}': expected 1.0, 0.7 or 0.3")]
    InvalidPayScale(String),
}

impl ActionError {
    /// Errors a well-behaved caller can never trigger.
    ///
    /// Only `InsufficientFunds` is a legitimate user-facing refusal; the
    /// rest mean the caller skipped a precondition check.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ActionError::InsufficientFunds { .. })
    }
}

/// Advance the simulation by one month.
///
/// While paused or while an event awaits a choice this is a no-op and
/// returns an unchanged copy of `state`.
pub fn step_world(
    state: &SimState,
    catalog: &Catalog,
    config: &SimConfig,
    mut metrics: Option<&mut SimMetrics>,
) -> SimState {
    if state.is_gated() {
        if let Some(m) = metrics {
            m.gated_ticks += 1;
        }
        return state.clone();
    }

    let start = Instant::now();
    let mut new_state = state.clone();

    // 1. Advance calendar
    new_state.date = state.date.next_month();
    new_state.tick += 1;

    // 2. Settle income and expenses
    let settle_start = Instant::now();
    let report = systems::run_settlement_tick(&mut new_state, &config.expense_model);
    new_state.last_settlement = Some(report);
    let settle_time = settle_start.elapsed();

    // 3. Check narrative triggers
    let scan_start = Instant::now();
    let triggered = systems::next_triggered(
        &catalog.events,
        &new_state.resolved_event_ids,
        new_state.date,
        config.event_epoch_year,
    );
    if let Some(event) = triggered {
        log::info!("{}: event '{}' ({}) triggered", new_state.date, event.name, event.id);
        new_state.pending_event = Some(event.clone());
    }
    let scan_time = scan_start.elapsed();

    if let Some(m) = metrics.as_deref_mut() {
        m.total_ticks += 1;
        m.settlement_time += settle_time;
        m.event_scan_time += scan_time;
        m.total_time += start.elapsed();
        if triggered.is_some() {
            m.events_triggered += 1;
        }
    }

    new_state
}

/// Apply a player command, producing the next snapshot.
///
/// On error the input snapshot is untouched and remains current.
pub fn apply_command(state: &SimState, cmd: &Command) -> Result<SimState, ActionError> {
    let mut new_state = state.clone();
    execute_command(&mut new_state, cmd)?;
    Ok(new_state)
}

fn execute_command(state: &mut SimState, cmd: &Command) -> Result<(), ActionError> {
    match cmd {
        Command::SetProvinceTax {
            province,
            field,
            value,
        } => {
            set_province_tax(state, province, *field, *value);
            Ok(())
        }
        Command::SetPayScale { scale } => {
            set_pay_scale(state, *scale);
            Ok(())
        }
        Command::Recruit { amount } => recruit(state, *amount),
        Command::ResolveEvent { option_id } => resolve_event(state, option_id),
        Command::TogglePause => {
            state.paused = !state.paused;
            log::debug!("Clock {}", if state.paused { "paused" } else { "resumed" });
            Ok(())
        }
        Command::SetActiveTab { tab } => {
            state.active_tab = *tab;
            Ok(())
        }
    }
}

/// Unknown province ids are ignored.
fn set_province_tax(state: &mut SimState, province_id: &str, field: TaxField, value: i64) {
    let Some(index) = state.provinces.iter().position(|p| p.id == province_id) else {
        log::warn!("Ignoring tax change for unknown province '{}'", province_id);
        return;
    };
    let clamped = value.clamp(0, u32::MAX as i64) as u32;
    if let Some(province) = state.provinces.get_mut(index) {
        province.taxes.set(field, clamped);
        log::debug!("{} {} tax set to {}", province.name, field, clamped);
    }
}

fn set_pay_scale(state: &mut SimState, scale: PayScale) {
    if state.pay_scale != scale {
        log::info!("Pay scale changed from {} to {}", state.pay_scale, scale);
    }
    state.pay_scale = scale;
}

/// Chronicle lines written by the `Recruit` command start with this.
pub(crate) const RECRUITED_ENTRY_PREFIX: &str = "Recruited ";

fn recruit(state: &mut SimState, amount: i64) -> Result<(), ActionError> {
    if amount <= 0 {
        return Err(ActionError::NonPositiveRecruitment(amount));
    }

    // A cost beyond the i64 range is unaffordable.
    let cost = Fixed::from_raw(defines::RECRUIT_COST_PER_HEAD)
        .checked_mul_int(amount)
        .unwrap_or(Fixed(i64::MAX));
    if state.treasury < cost {
        return Err(ActionError::InsufficientFunds {
            required: cost,
            available: state.treasury,
        });
    }

    state.treasury -= cost;
    adjust_troops(state, TroopCategory::Recruit, amount);
    state
        .history
        .push_back(format!("{RECRUITED_ENTRY_PREFIX}{amount} new troops."));
    log::info!("Recruited {} troops for {}", amount, cost);
    Ok(())
}

fn resolve_event(state: &mut SimState, option_id: &str) -> Result<(), ActionError> {
    let event = state
        .pending_event
        .clone()
        .ok_or(ActionError::NoPendingEvent)?;
    let option = event
        .option(option_id)
        .ok_or_else(|| ActionError::UnknownOption {
            event: event.id.clone(),
            option: option_id.to_string(),
        })?;

    let impact = &option.impact;
    state.treasury = state
        .treasury
        .saturating_add(Fixed::from_int(impact.treasury.unwrap_or(0)));
    state.prestige = state.prestige.saturating_add(impact.prestige.unwrap_or(0));
    adjust_troops(state, TroopCategory::Recruit, impact.military.unwrap_or(0));

    state
        .history
        .push_back(format!("[{}] chose: {}", event.name, option.text));
    let previous = state.resolved_event_ids.insert(event.id.clone());
    debug_assert!(previous.is_none(), "event {} resolved twice", event.id);
    state.pending_event = None;
    // Resolution always restarts the clock, even if it was paused before.
    state.paused = false;

    log::info!("Resolved '{}' with option {}", event.id, option.id);
    Ok(())
}

/// Upper bound of a single troop category, so head counts stay valid `i64`s.
const MAX_TROOPS_PER_CATEGORY: u64 = i64::MAX as u64;

/// Adds `delta` troops to a category, clamped to `0..=MAX_TROOPS_PER_CATEGORY`.
fn adjust_troops(state: &mut SimState, category: TroopCategory, delta: i64) {
    let next = (state.troops(category) as i128 + delta as i128)
        .clamp(0, MAX_TROOPS_PER_CATEGORY as i128);
    state
        .military
        .insert(category, u64::try_from(next).unwrap_or(MAX_TROOPS_PER_CATEGORY));
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
