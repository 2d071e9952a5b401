use crate::state::{PayScale, Tab};
use nanming_data::TaxField;
use serde::{Deserialize, Serialize};

/// Player intents, applied outside the clock tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // Finance
    SetProvinceTax {
        province: String,
        field: TaxField,
        /// Clamped to zero if negative.
        value: i64,
    },
    SetPayScale {
        scale: PayScale,
    },

    // Military
    Recruit {
        amount: i64,
    },

    // Narrative
    ResolveEvent {
        option_id: String,
    },

    // Meta
    TogglePause,
    SetActiveTab {
        tab: Option<Tab>,
    },
}
