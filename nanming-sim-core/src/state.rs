use crate::fixed::{Fixed, MonthlyAccrual};
use crate::systems::settlement::SettlementReport;
use nanming_data::{EventDef, TaxDetails};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use im::{OrdMap, OrdSet, Vector};

/// A simulated month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8, // 1-12
}

impl CalendarDate {
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }

    /// The following month, rolling December over into January.
    pub fn next_month(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        use nanming_data::defines::calendar;
        Self::new(calendar::START_YEAR, calendar::START_MONTH)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroopCategory {
    TopTier,
    Elite,
    Veteran,
    Recruit,
    Conscript,
}

impl TroopCategory {
    pub const ALL: [TroopCategory; 5] = [
        TroopCategory::TopTier,
        TroopCategory::Elite,
        TroopCategory::Veteran,
        TroopCategory::Recruit,
        TroopCategory::Conscript,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TroopCategory::TopTier => "top-tier",
            TroopCategory::Elite => "elite",
            TroopCategory::Veteran => "veteran",
            TroopCategory::Recruit => "recruit",
            TroopCategory::Conscript => "conscript",
        }
    }
}

/// Share of wages actually paid to the army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayScale {
    #[default]
    Full,
    Reduced,
    Minimal,
}

impl PayScale {
    pub const ALL: [PayScale; 3] = [PayScale::Full, PayScale::Reduced, PayScale::Minimal];

    /// Multiplier applied to maintenance: 1.0, 0.7 or 0.3.
    pub fn factor(self) -> Fixed {
        match self {
            PayScale::Full => Fixed::ONE,
            PayScale::Reduced => Fixed::from_raw(7000),
            PayScale::Minimal => Fixed::from_raw(3000),
        }
    }
}

impl fmt::Display for PayScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.factor().to_f64())
    }
}

impl TryFrom<Fixed> for PayScale {
    type Error = crate::step::ActionError;

    fn try_from(value: Fixed) -> Result<Self, Self::Error> {
        PayScale::ALL
            .into_iter()
            .find(|scale| scale.factor() == value)
            .ok_or_else(|| crate::step::ActionError::InvalidPayScale(value.to_string()))
    }
}

impl TryFrom<f32> for PayScale {
    type Error = crate::step::ActionError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        PayScale::try_from(Fixed::from_f32(value))
    }
}

impl std::str::FromStr for PayScale {
    type Err = crate::step::ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(PayScale::Full),
            "reduced" => Ok(PayScale::Reduced),
            "minimal" => Ok(PayScale::Minimal),
            other => other
                .parse::<f32>()
                .map_err(|_| crate::step::ActionError::InvalidPayScale(s.to_string()))
                .and_then(PayScale::try_from),
        }
    }
}

/// Overlay currently shown by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Interior,
    Technology,
    Military,
    Finance,
    Diplomacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub name: String,
    pub taxes: TaxDetails,
}

/// The complete simulation snapshot.
///
/// Every transition produces a new value; the `im` collections make each
/// clone O(1) with structural sharing, so old snapshots stay valid for
/// whoever still holds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    /// Ten-thousands of taels. May go negative.
    pub treasury: Fixed,
    pub prestige: i64,
    pub infamy: i64,
    pub date: CalendarDate,
    pub paused: bool,
    pub provinces: Vector<Province>,
    pub military: OrdMap<TroopCategory, u64>,
    pub pay_scale: PayScale,
    /// Append-only chronicle, oldest first.
    pub history: Vector<String>,
    pub active_tab: Option<Tab>,
    pub pending_event: Option<EventDef>,
    pub resolved_event_ids: OrdSet<String>,
    /// Settlement carry between monthly installments.
    pub accrual: MonthlyAccrual,
    /// Statement of the most recent settled month.
    pub last_settlement: Option<SettlementReport>,
    /// Months settled since the simulation started.
    pub tick: u64,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            treasury: Fixed::ZERO,
            prestige: 0,
            infamy: 0,
            date: CalendarDate::default(),
            paused: false,
            provinces: Vector::new(),
            military: TroopCategory::ALL.into_iter().map(|c| (c, 0u64)).collect(),
            pay_scale: PayScale::Full,
            history: Vector::new(),
            active_tab: None,
            pending_event: None,
            resolved_event_ids: OrdSet::new(),
            accrual: MonthlyAccrual::default(),
            last_settlement: None,
            tick: 0,
        }
    }
}

impl SimState {
    /// True when the clock must not advance.
    pub fn is_gated(&self) -> bool {
        self.paused || self.pending_event.is_some()
    }

    pub fn troops(&self, category: TroopCategory) -> u64 {
        self.military.get(&category).copied().unwrap_or(0)
    }

    pub fn total_troops(&self) -> u64 {
        self.military
            .values()
            .fold(0u64, |total, &n| total.saturating_add(n))
    }

    /// Sum of every province's five tax fields, in ten-thousands per year.
    pub fn annual_tax_income(&self) -> u64 {
        self.provinces.iter().map(|p| p.taxes.total()).sum()
    }

    pub fn province(&self, id: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.id == id)
    }

    /// Deterministic checksum of the simulation-relevant state.
    ///
    /// Presentation-only fields (`active_tab`) and the cached statement are
    /// excluded; identical histories produce identical checksums.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.date.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        self.treasury.hash(&mut hasher);
        self.prestige.hash(&mut hasher);
        self.infamy.hash(&mut hasher);
        self.paused.hash(&mut hasher);
        self.pay_scale.hash(&mut hasher);
        self.accrual.hash(&mut hasher);

        // Ordered collections iterate deterministically.
        for province in &self.provinces {
            province.id.hash(&mut hasher);
            province.taxes.hash(&mut hasher);
        }
        for (category, count) in &self.military {
            category.hash(&mut hasher);
            count.hash(&mut hasher);
        }
        for id in &self.resolved_event_ids {
            id.hash(&mut hasher);
        }
        self.pending_event
            .as_ref()
            .map(|e| e.id.as_str())
            .hash(&mut hasher);
        self.history.len().hash(&mut hasher);
        for entry in &self.history {
            entry.hash(&mut hasher);
        }

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimStateBuilder;

    #[test]
    fn test_default_state_lists_every_category_empty() {
        let state = SimState::default();
        assert_eq!(state.military.len(), TroopCategory::ALL.len());
        for category in TroopCategory::ALL {
            assert_eq!(state.military.get(&category), Some(&0));
        }
        assert_eq!(state.total_troops(), 0);
    }

    #[test]
    fn test_total_troops_saturates() {
        let state = SimStateBuilder::new()
            .troops(TroopCategory::Recruit, u64::MAX)
            .troops(TroopCategory::Conscript, 1)
            .build();
        assert_eq!(state.total_troops(), u64::MAX);
    }

    #[test]
    fn test_next_month_simple() {
        assert_eq!(
            CalendarDate::new(1644, 4).next_month(),
            CalendarDate::new(1644, 5)
        );
    }

    #[test]
    fn test_next_month_year_rollover() {
        assert_eq!(
            CalendarDate::new(1644, 12).next_month(),
            CalendarDate::new(1645, 1)
        );
    }

    #[test]
    fn test_date_ordering_is_lexicographic() {
        assert!(CalendarDate::new(1644, 12) < CalendarDate::new(1645, 1));
        assert!(CalendarDate::new(1644, 5) < CalendarDate::new(1644, 6));
        assert_eq!(CalendarDate::new(1644, 5).to_string(), "1644.5");
    }

    #[test]
    fn test_pay_scale_parsing() {
        assert_eq!("1.0".parse::<PayScale>().unwrap(), PayScale::Full);
        assert_eq!("0.7".parse::<PayScale>().unwrap(), PayScale::Reduced);
        assert_eq!("minimal".parse::<PayScale>().unwrap(), PayScale::Minimal);
        assert_eq!(PayScale::try_from(0.3f32).unwrap(), PayScale::Minimal);
        assert!("0.5".parse::<PayScale>().is_err());
        assert!("half".parse::<PayScale>().is_err());
        assert!(PayScale::try_from(Fixed::from_raw(6999)).is_err());
    }

    #[test]
    fn test_pay_scale_display() {
        assert_eq!(PayScale::Full.to_string(), "1.0");
        assert_eq!(PayScale::Reduced.to_string(), "0.7");
    }

    #[test]
    fn test_totals() {
        let state = SimStateBuilder::new()
            .with_province("p1", TaxDetails::new(70, 8, 15, 3, 4))
            .with_province("p2", TaxDetails::new(10, 0, 0, 0, 2))
            .troops(TroopCategory::Elite, 4_000)
            .troops(TroopCategory::Recruit, 25_000)
            .build();

        assert_eq!(state.annual_tax_income(), 112);
        assert_eq!(state.total_troops(), 29_000);
        assert_eq!(state.troops(TroopCategory::Veteran), 0);
    }

    #[test]
    fn test_gating() {
        let mut state = SimStateBuilder::new().build();
        assert!(!state.is_gated());
        state.paused = true;
        assert!(state.is_gated());
    }

    #[test]
    fn test_checksum_determinism() {
        let state = SimStateBuilder::new()
            .treasury(20)
            .with_province("p1", TaxDetails::new(1, 2, 3, 4, 5))
            .build();
        assert_eq!(state.checksum(), state.clone().checksum());
    }

    #[test]
    fn test_checksum_sensitivity() {
        let state1 = SimStateBuilder::new().date(1644, 5).build();
        let state2 = SimStateBuilder::new().date(1644, 6).build();
        assert_ne!(state1.checksum(), state2.checksum());
    }

    #[test]
    fn test_checksum_ignores_active_tab() {
        let state1 = SimStateBuilder::new().build();
        let mut state2 = state1.clone();
        state2.active_tab = Some(Tab::Finance);
        assert_eq!(state1.checksum(), state2.checksum());
    }
}
