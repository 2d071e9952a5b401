//! Reference data for the Southern Ming court simulation.
//!
//! Everything in this crate is immutable catalog data: the prefectures of the
//! Southern Metropolitan region with their tax seeds, the court officials, the
//! regional commanders, and the scripted narrative events. The simulation core
//! reads it once at startup and never writes to it.
//!
//! The built-in catalog can be replaced by a JSON file with the same shape
//! (see [`Catalog::load`]).

pub mod builtin;
pub mod catalog;
pub mod defines;
pub mod types;

pub use catalog::{Catalog, DataError};
pub use types::{
    EventDef, EventImpact, EventOption, Faction, Official, ProvinceDef, Stance, TaxDetails,
    TaxField, Warlord, generate_taxes,
};
