//! Game mechanic constants (defines).
//!
//! Currency figures are in ten-thousands of taels unless noted otherwise.

/// Economy constants
pub mod economy {
    /// Annual upkeep per soldier, in taels.
    pub const MAINTENANCE_PER_HEAD: i64 = 15;

    /// One-off recruitment cost per soldier, in taels.
    pub const RECRUIT_COST_PER_HEAD: i64 = 2;

    /// Taels per treasury unit (the treasury is kept in ten-thousands).
    pub const UNIT_SCALE: i64 = 10_000;

    /// Months in a year for income and upkeep installments.
    pub const MONTHS_PER_YEAR: i64 = 12;

    /// Lower bound of the generated annual tax base for a prefecture.
    pub const GENERATED_TAX_BASE_MIN: u32 = 40;

    /// Width of the generated tax base range (exclusive upper offset).
    pub const GENERATED_TAX_BASE_SPREAD: u32 = 40;
}

/// Calendar constants
pub mod calendar {
    /// Year the scripted events are anchored to.
    pub const EVENT_EPOCH_YEAR: i32 = 1644;

    pub const START_YEAR: i32 = 1644;
    pub const START_MONTH: u8 = 4;
}

/// Narrative event constants
pub mod events {
    /// Largest magnitude any single impact field (treasury, prestige or
    /// military) may carry in a catalog.
    pub const MAX_IMPACT_MAGNITUDE: i64 = 1_000_000_000;
}

/// Opening position of the court.
pub mod start {
    /// Starting treasury (ten-thousands of taels).
    pub const TREASURY: i64 = 20;
    pub const PRESTIGE: i64 = 200;
    pub const INFAMY: i64 = 10;

    /// Troops per category: top-tier, elite, veteran, recruit, conscript (80,000 total).
    pub const ROSTER: [u32; 5] = [1_000, 4_000, 10_000, 25_000, 40_000];

    /// Opening line of the chronicle.
    pub const CHRONICLE_OPENING: &str =
        "The fall of Beijing: the Ming lingers on in the south, struggling to survive.";
}
