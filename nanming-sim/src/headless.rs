//! Headless runner: settles months back to back without a wall clock.

use crate::RunnerError;
use nanming_data::{Catalog, EventDef, EventOption};
use nanming_sim_core::{
    apply_command, step_world, ActionError, Command, ObserverRegistry, PayScale, SimConfig,
    SimMetrics, SimState, Snapshot,
};
use std::str::FromStr;

/// Which option the runner picks for every pending event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChoicePolicy {
    #[default]
    First,
    Last,
    /// A specific option id, falling back to the first option when an event
    /// does not offer it.
    Option(String),
}

impl ChoicePolicy {
    pub fn choose<'a>(&self, event: &'a EventDef) -> Option<&'a EventOption> {
        match self {
            ChoicePolicy::First => event.options.first(),
            ChoicePolicy::Last => event.options.last(),
            ChoicePolicy::Option(id) => event.option(id).or_else(|| {
                log::warn!(
                    "Event '{}' has no option '{}', taking the first",
                    event.id,
                    id
                );
                event.options.first()
            }),
        }
    }
}

impl FromStr for ChoicePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("choice must be 'first', 'last' or an option id".to_string()),
            "first" => Ok(ChoicePolicy::First),
            "last" => Ok(ChoicePolicy::Last),
            id => Ok(ChoicePolicy::Option(id.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Months to settle.
    pub months: u32,
    pub choice: ChoicePolicy,
    /// Applied once before the first tick.
    pub pay_scale: Option<PayScale>,
    /// Troops to recruit before the first tick. Refused recruitment is logged
    /// and the run continues.
    pub recruit: Option<i64>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            months: 12,
            choice: ChoicePolicy::First,
            pay_scale: None,
            recruit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessOutcome {
    pub state: SimState,
    pub metrics: SimMetrics,
}

/// Run `options.months` settlements, resolving each event as it triggers.
///
/// The clock is unpaused before the first tick. An event triggered by the
/// final tick stays pending in the returned state.
pub fn run_headless(
    initial: SimState,
    catalog: &Catalog,
    config: &SimConfig,
    options: &HeadlessOptions,
    observers: &ObserverRegistry,
) -> Result<HeadlessOutcome, RunnerError> {
    let mut metrics = SimMetrics::default();
    let mut state = initial;
    notify(observers, config, &state);

    if let Some(scale) = options.pay_scale {
        state = apply(&state, Command::SetPayScale { scale }, &mut metrics)?;
    }
    if let Some(amount) = options.recruit {
        match apply(&state, Command::Recruit { amount }, &mut metrics) {
            Ok(next) => state = next,
            Err(e @ ActionError::InsufficientFunds { .. }) => {
                log::warn!("Recruitment of {} refused: {}", amount, e)
            }
            Err(e) => return Err(e.into()),
        }
    }
    if state.paused {
        state = apply(&state, Command::TogglePause, &mut metrics)?;
    }
    notify(observers, config, &state);

    let target = state.tick + u64::from(options.months);
    while state.tick < target {
        if let Some(event) = &state.pending_event {
            let option_id = options
                .choice
                .choose(event)
                .map(|option| option.id.clone())
                .ok_or_else(|| ActionError::UnknownOption {
                    event: event.id.clone(),
                    option: format!("{:?}", options.choice),
                })?;
            log::debug!("Resolving '{}' with option {}", event.id, option_id);
            state = apply(&state, Command::ResolveEvent { option_id }, &mut metrics)?;
        } else {
            state = step_world(&state, catalog, config, Some(&mut metrics));
        }
        notify(observers, config, &state);
    }

    Ok(HeadlessOutcome { state, metrics })
}

fn apply(
    state: &SimState,
    cmd: Command,
    metrics: &mut SimMetrics,
) -> Result<SimState, ActionError> {
    let result = apply_command(state, &cmd);
    match &result {
        Ok(_) => metrics.commands_applied += 1,
        Err(_) => metrics.commands_rejected += 1,
    }
    result
}

fn notify(observers: &ObserverRegistry, config: &SimConfig, state: &SimState) {
    if observers.is_empty() {
        return;
    }
    let checksum = if config.should_checksum(state.tick) {
        state.checksum()
    } else {
        0
    };
    observers.notify(&Snapshot::new(state.clone(), state.tick, checksum));
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanming_sim_core::{initial_state, Fixed, TroopCategory};

    fn run(options: HeadlessOptions) -> HeadlessOutcome {
        let catalog = Catalog::builtin();
        let state = initial_state(&catalog, 7);
        run_headless(
            state,
            &catalog,
            &SimConfig::default(),
            &options,
            &ObserverRegistry::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_choice_policy_parsing() {
        assert_eq!("first".parse::<ChoicePolicy>(), Ok(ChoicePolicy::First));
        assert_eq!("last".parse::<ChoicePolicy>(), Ok(ChoicePolicy::Last));
        assert_eq!(
            "B".parse::<ChoicePolicy>(),
            Ok(ChoicePolicy::Option("B".to_string()))
        );
        assert!("  ".parse::<ChoicePolicy>().is_err());
    }

    #[test]
    fn test_choice_policy_falls_back_to_first() {
        let catalog = Catalog::builtin();
        let event = &catalog.events[0];
        let choice = ChoicePolicy::Option("Z".into()).choose(event).unwrap();
        assert_eq!(choice.id, event.options[0].id);
        assert_eq!(
            ChoicePolicy::Last.choose(event).unwrap().id,
            event.options.last().unwrap().id
        );
    }

    #[test]
    fn test_first_year_resolves_both_events() {
        let outcome = run(HeadlessOptions::default());
        let state = &outcome.state;

        assert_eq!(state.tick, 12);
        assert_eq!(state.date.to_string(), "1645.4");
        assert!(state.pending_event.is_none());
        assert_eq!(state.resolved_event_ids.len(), 2);
        assert_eq!(outcome.metrics.total_ticks, 12);
        // Unpause plus two resolutions.
        assert_eq!(outcome.metrics.commands_applied, 3);
    }

    #[test]
    fn test_final_tick_event_stays_pending() {
        // One month from 1644.4 reaches May and triggers the first event.
        let outcome = run(HeadlessOptions {
            months: 1,
            ..HeadlessOptions::default()
        });
        assert!(outcome.state.pending_event.is_some());
        assert!(outcome.state.resolved_event_ids.is_empty());
    }

    #[test]
    fn test_refused_recruitment_does_not_abort() {
        let outcome = run(HeadlessOptions {
            months: 0,
            recruit: Some(1_000_000),
            ..HeadlessOptions::default()
        });
        assert_eq!(outcome.state.treasury, Fixed::from_int(20));
        assert_eq!(outcome.metrics.commands_rejected, 1);
    }

    #[test]
    fn test_recruit_and_pay_scale_applied_up_front() {
        let outcome = run(HeadlessOptions {
            months: 0,
            recruit: Some(10_000),
            pay_scale: Some(PayScale::Minimal),
            ..HeadlessOptions::default()
        });
        assert_eq!(outcome.state.treasury, Fixed::from_int(18));
        assert_eq!(outcome.state.troops(TroopCategory::Recruit), 35_000);
        assert_eq!(outcome.state.pay_scale, PayScale::Minimal);
        assert!(!outcome.state.paused);
    }

    #[test]
    fn test_non_positive_recruitment_is_an_error() {
        let catalog = Catalog::builtin();
        let result = run_headless(
            initial_state(&catalog, 7),
            &catalog,
            &SimConfig::default(),
            &HeadlessOptions {
                recruit: Some(0),
                ..HeadlessOptions::default()
            },
            &ObserverRegistry::new(),
        );
        assert!(matches!(
            result,
            Err(RunnerError::Rejected(ActionError::NonPositiveRecruitment(0)))
        ));
    }
}
