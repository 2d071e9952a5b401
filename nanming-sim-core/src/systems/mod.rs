//! Monthly settlement systems.

pub mod events;
pub mod expenses;
pub mod settlement;
pub mod taxation;

pub use events::next_triggered;
pub use expenses::{ExpenseBreakdown, ExpenseItem, ExpenseModel};
pub use settlement::{run_settlement_tick, SettlementReport};
pub use taxation::annual_income;
