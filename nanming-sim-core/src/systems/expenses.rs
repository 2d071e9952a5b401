use crate::fixed::Fixed;
use crate::state::PayScale;
use nanming_data::defines::economy as defines;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which cost components the monthly settlement charges.
///
/// `MaintenanceOnly` is the default: the army's wages and nothing else.
/// `Itemized` adds a surcharge proportional to maintenance, split across the
/// court household, official stipends and public works in a 4:3:3 ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpenseModel {
    #[default]
    MaintenanceOnly,
    Itemized {
        /// Share of maintenance charged on top (0.5 = +50%).
        surcharge: Fixed,
    },
}

impl ExpenseModel {
    /// The itemized model with the standard +50% surcharge.
    pub const fn itemized() -> Self {
        ExpenseModel::Itemized {
            surcharge: Fixed::HALF,
        }
    }

    /// Annual cost statement for a standing army of `troops` at `pay_scale`.
    pub fn annual_expenses(&self, troops: u64, pay_scale: PayScale) -> ExpenseBreakdown {
        // troops × 15 taels × pay scale; one raw unit is one tael.
        let maintenance = Fixed::from_raw(defines::MAINTENANCE_PER_HEAD)
            .mul_int(i64::try_from(troops).unwrap_or(i64::MAX))
            * pay_scale.factor();

        let extras = match *self {
            ExpenseModel::MaintenanceOnly => Vec::new(),
            ExpenseModel::Itemized { surcharge } => {
                let pool = maintenance * surcharge;
                ExpenseItem::ALL
                    .into_iter()
                    .map(|item| (item, pool.mul_int(item.weight()) / Fixed::from_int(10)))
                    .collect()
            }
        };

        ExpenseBreakdown {
            maintenance,
            extras,
        }
    }
}

impl fmt::Display for ExpenseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseModel::MaintenanceOnly => f.write_str("maintenance-only"),
            ExpenseModel::Itemized { surcharge } => write!(f, "itemized (+{surcharge})"),
        }
    }
}

/// Non-military cost lines of the itemized model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseItem {
    CourtHousehold,
    OfficialStipends,
    PublicWorks,
}

impl ExpenseItem {
    pub const ALL: [ExpenseItem; 3] = [
        ExpenseItem::CourtHousehold,
        ExpenseItem::OfficialStipends,
        ExpenseItem::PublicWorks,
    ];

    /// Tenths of the surcharge pool.
    fn weight(self) -> i64 {
        match self {
            ExpenseItem::CourtHousehold => 4,
            ExpenseItem::OfficialStipends => 3,
            ExpenseItem::PublicWorks => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExpenseItem::CourtHousehold => "court household",
            ExpenseItem::OfficialStipends => "official stipends",
            ExpenseItem::PublicWorks => "public works",
        }
    }
}

/// Annual expenses by component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub maintenance: Fixed,
    pub extras: Vec<(ExpenseItem, Fixed)>,
}

impl ExpenseBreakdown {
    pub fn extras_total(&self) -> Fixed {
        self.extras
            .iter()
            .fold(Fixed::ZERO, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    pub fn total(&self) -> Fixed {
        self.maintenance.saturating_add(self.extras_total())
    }
}
