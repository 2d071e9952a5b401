use crate::fixed::Fixed;
use crate::state::{CalendarDate, PayScale, Province, SimState, TroopCategory};
use nanming_data::{EventDef, EventImpact, EventOption, TaxDetails};

/// Builds scenario states for tests: empty realm, no troops, running clock.
pub struct SimStateBuilder {
    state: SimState,
}

impl SimStateBuilder {
    pub fn new() -> Self {
        Self {
            state: SimState {
                date: CalendarDate::new(1644, 4),
                ..SimState::default()
            },
        }
    }

    pub fn date(mut self, year: i32, month: u8) -> Self {
        self.state.date = CalendarDate::new(year, month);
        self
    }

    /// Treasury in ten-thousands of taels.
    pub fn treasury(mut self, units: i64) -> Self {
        self.state.treasury = Fixed::from_int(units);
        self
    }

    pub fn prestige(mut self, prestige: i64) -> Self {
        self.state.prestige = prestige;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.state.paused = paused;
        self
    }

    pub fn pay_scale(mut self, scale: PayScale) -> Self {
        self.state.pay_scale = scale;
        self
    }

    pub fn troops(mut self, category: TroopCategory, count: u64) -> Self {
        self.state.military.insert(category, count);
        self
    }

    pub fn with_province(mut self, id: &str, taxes: TaxDetails) -> Self {
        self.state.provinces.push_back(Province {
            id: id.to_string(),
            name: id.to_string(),
            taxes,
        });
        self
    }

    pub fn pending(mut self, event: EventDef) -> Self {
        self.state.pending_event = Some(event);
        self
    }

    pub fn resolved(mut self, event_id: &str) -> Self {
        self.state.resolved_event_ids.insert(event_id.to_string());
        self
    }

    pub fn build(self) -> SimState {
        self.state
    }
}

impl Default for SimStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-option-per-impact event for tests.
pub fn test_event(id: &str, trigger_month: u8, options: &[(&str, EventImpact)]) -> EventDef {
    EventDef {
        id: id.to_string(),
        name: format!("Test {id}"),
        trigger_month,
        background: String::new(),
        options: options
            .iter()
            .map(|(opt_id, impact)| EventOption {
                id: opt_id.to_string(),
                text: format!("Option {opt_id}"),
                impact_description: String::new(),
                impact: impact.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let state = SimStateBuilder::default()
            .treasury(20)
            .prestige(200)
            .with_province("p1", TaxDetails::new(1, 0, 0, 0, 0))
            .troops(TroopCategory::Recruit, 5)
            .build();

        assert_eq!(state.treasury, Fixed::from_int(20));
        assert_eq!(state.prestige, 200);
        assert_eq!(state.provinces.len(), 1);
        assert_eq!(state.troops(TroopCategory::Recruit), 5);
        assert_eq!(state.military.len(), 5);
        assert!(!state.is_gated());
    }
}
