//! Initial state construction from the reference catalog.

use crate::fixed::Fixed;
use crate::state::{CalendarDate, PayScale, Province, SimState, TroopCategory, Vector};
use nanming_data::defines::{calendar, economy, start};
use nanming_data::{generate_taxes, Catalog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the opening snapshot.
///
/// Prefectures without fixed seed taxes get a base drawn uniformly from
/// `40..80` with an RNG seeded by `rng_seed`, so the same seed always yields
/// the same realm. The clock starts paused.
pub fn initial_state(catalog: &Catalog, rng_seed: u64) -> SimState {
    let mut rng = StdRng::seed_from_u64(rng_seed);

    let provinces: Vector<Province> = catalog
        .provinces
        .iter()
        .map(|def| {
            let taxes = def.taxes.unwrap_or_else(|| {
                let base = economy::GENERATED_TAX_BASE_MIN
                    + rng.gen_range(0..economy::GENERATED_TAX_BASE_SPREAD);
                generate_taxes(base)
            });
            Province {
                id: def.id.clone(),
                name: def.name.clone(),
                taxes,
            }
        })
        .collect();

    let state = SimState {
        treasury: Fixed::from_int(start::TREASURY),
        prestige: start::PRESTIGE,
        infamy: start::INFAMY,
        date: CalendarDate::new(calendar::START_YEAR, calendar::START_MONTH),
        paused: true,
        provinces,
        military: TroopCategory::ALL
            .into_iter()
            .zip(start::ROSTER.iter().map(|&n| n as u64))
            .collect(),
        pay_scale: PayScale::Full,
        history: Vector::unit(start::CHRONICLE_OPENING.to_string()),
        ..SimState::default()
    };

    log::info!(
        "Initial state {}: {} provinces, {} a year in taxes, {} troops",
        state.date,
        state.provinces.len(),
        state.annual_tax_income(),
        state.total_troops()
    );
    state
}
