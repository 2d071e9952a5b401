//! Catalog record types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Annual tax contributions of one prefecture, in ten-thousands of taels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TaxDetails {
    pub land: u32,
    pub salt: u32,
    pub merchant: u32,
    pub maritime: u32,
    pub misc: u32,
}

/// Names one of the five tax fields of a [`TaxDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxField {
    Land,
    Salt,
    Merchant,
    Maritime,
    Misc,
}

impl TaxField {
    pub const ALL: [TaxField; 5] = [
        TaxField::Land,
        TaxField::Salt,
        TaxField::Merchant,
        TaxField::Maritime,
        TaxField::Misc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaxField::Land => "land",
            TaxField::Salt => "salt",
            TaxField::Merchant => "merchant",
            TaxField::Maritime => "maritime",
            TaxField::Misc => "misc",
        }
    }
}

impl fmt::Display for TaxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TaxField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tax field '{s}'"))
    }
}

impl TaxDetails {
    pub const fn new(land: u32, salt: u32, merchant: u32, maritime: u32, misc: u32) -> Self {
        Self {
            land,
            salt,
            merchant,
            maritime,
            misc,
        }
    }

    pub fn get(&self, field: TaxField) -> u32 {
        match field {
            TaxField::Land => self.land,
            TaxField::Salt => self.salt,
            TaxField::Merchant => self.merchant,
            TaxField::Maritime => self.maritime,
            TaxField::Misc => self.misc,
        }
    }

    pub fn set(&mut self, field: TaxField, value: u32) {
        let slot = match field {
            TaxField::Land => &mut self.land,
            TaxField::Salt => &mut self.salt,
            TaxField::Merchant => &mut self.merchant,
            TaxField::Maritime => &mut self.maritime,
            TaxField::Misc => &mut self.misc,
        };
        *slot = value;
    }

    /// Annual total across all five fields.
    pub fn total(&self) -> u64 {
        TaxField::ALL
            .into_iter()
            .map(|field| u64::from(self.get(field)))
            .sum()
    }
}

/// Splits an annual base figure into the five tax fields.
///
/// Shares are 70% land, 8% salt, 15% merchant, 3% maritime, 4% misc, each
/// floored, so the fields may sum to slightly less than `base`.
pub fn generate_taxes(base: u32) -> TaxDetails {
    let share = |percent: u32| base * percent / 100;
    TaxDetails {
        land: share(70),
        salt: share(8),
        merchant: share(15),
        maritime: share(3),
        misc: share(4),
    }
}

/// A prefecture as declared in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDef {
    /// Stable identifier (e.g. `pref-1`).
    pub id: String,
    pub name: String,
    /// Fixed seed taxes. `None` means taxes are generated at initialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<TaxDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    pub role: String,
    pub name: String,
    pub description: String,
}

/// Diplomatic stance toward the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Hostile,
    Peaceful,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Hostile => f.write_str("hostile"),
            Stance::Peaceful => f.write_str("peaceful"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
    pub stance: Stance,
    pub description: String,
}

/// A named commander, either a regional Ming general or an enemy prince.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warlord {
    pub name: String,
    pub title: String,
    /// Garrison or campaign assignment.
    pub location: String,
    /// Reported strength as display text (e.g. "30,000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troops: Option<String>,
    pub stance: Stance,
}

/// Numeric consequences of choosing an [`EventOption`].
///
/// Absent fields mean "no change".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventImpact {
    /// Treasury delta in ten-thousands of taels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prestige: Option<i64>,
    /// Change to the recruit pool (head count).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub military: Option<i64>,
    /// Descriptive only, never applied numerically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub id: String,
    pub text: String,
    pub impact_description: String,
    #[serde(default)]
    pub impact: EventImpact,
}

/// A scripted narrative event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: String,
    pub name: String,
    /// Month (1-12) of the epoch year from which the event may fire.
    pub trigger_month: u8,
    pub background: String,
    pub options: Vec<EventOption>,
}

impl EventDef {
    pub fn option(&self, option_id: &str) -> Option<&EventOption> {
        self.options.iter().find(|opt| opt.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_taxes_floors_each_share() {
        let taxes = generate_taxes(57);
        assert_eq!(taxes, TaxDetails::new(39, 4, 8, 1, 2));
        assert!(taxes.total() <= 57);
    }

    #[test]
    fn test_generate_taxes_of_hundred_is_exact() {
        assert_eq!(generate_taxes(100), TaxDetails::new(70, 8, 15, 3, 4));
        assert_eq!(generate_taxes(100).total(), 100);
    }

    #[test]
    fn test_tax_field_get_set() {
        let mut taxes = TaxDetails::default();
        for (i, field) in TaxField::ALL.into_iter().enumerate() {
            taxes.set(field, i as u32 + 1);
        }
        assert_eq!(taxes, TaxDetails::new(1, 2, 3, 4, 5));
        assert_eq!(taxes.get(TaxField::Maritime), 4);
        assert_eq!(taxes.total(), 15);
    }

    #[test]
    fn test_tax_field_parse() {
        assert_eq!("salt".parse::<TaxField>(), Ok(TaxField::Salt));
        assert_eq!("MISC".parse::<TaxField>(), Ok(TaxField::Misc));
        assert!("tithe".parse::<TaxField>().is_err());
    }

    #[test]
    fn test_event_impact_absent_fields_deserialize_as_none() {
        let impact: EventImpact = serde_json::from_str(r#"{"prestige": -10}"#).unwrap();
        assert_eq!(impact.prestige, Some(-10));
        assert!(impact.treasury.is_none());
        assert!(impact.military.is_none());
    }
}
