use crate::fixed::Fixed;
use crate::state::{CalendarDate, SimState};
use crate::systems::expenses::{ExpenseItem, ExpenseModel};
use crate::systems::taxation::annual_income;
use nanming_data::defines::economy::MONTHS_PER_YEAR;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Monthly statement kept on the snapshot for display.
///
/// `income`, `maintenance` and `extras` are the nominal monthly figures
/// (annual / 12, truncated). `net` is what was actually booked, including the
/// carried remainder, so summing `net` over a run reproduces the treasury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub date: CalendarDate,
    pub income: Fixed,
    pub maintenance: Fixed,
    pub extras: Vec<(ExpenseItem, Fixed)>,
    pub net: Fixed,
}

impl SettlementReport {
    pub fn expenses(&self) -> Fixed {
        self.extras
            .iter()
            .fold(self.maintenance, |acc, (_, amount)| acc.saturating_add(*amount))
    }
}

fn monthly(annual: Fixed) -> Fixed {
    Fixed::from_raw(annual.raw() / MONTHS_PER_YEAR)
}

/// Books one month of income and expenses into the treasury.
///
/// The treasury has no floor; a deficit simply carries forward.
#[instrument(skip_all, name = "settlement")]
pub fn run_settlement_tick(state: &mut SimState, model: &ExpenseModel) -> SettlementReport {
    let income = annual_income(&state.provinces);
    let expenses = model.annual_expenses(state.total_troops(), state.pay_scale);

    let net = state
        .accrual
        .installment(income.saturating_sub(expenses.total()));
    state.treasury = state.treasury.saturating_add(net);

    log::debug!(
        "Settled {}: income {} expenses {} net {} treasury {}",
        state.date,
        monthly(income),
        monthly(expenses.total()),
        net,
        state.treasury
    );

    SettlementReport {
        date: state.date,
        income: monthly(income),
        maintenance: monthly(expenses.maintenance),
        extras: expenses
            .extras
            .iter()
            .map(|&(item, amount)| (item, monthly(amount)))
            .collect(),
        net,
    }
}
