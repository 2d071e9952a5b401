//! The catalog aggregate and its JSON loader.

use crate::builtin;
use crate::defines::events::MAX_IMPACT_MAGNITUDE;
use crate::types::{EventDef, Faction, Official, ProvinceDef, Warlord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate province id '{0}'")]
    DuplicateProvince(String),
    #[error("Duplicate event id '{0}'")]
    DuplicateEvent(String),
    #[error("Event '{0}' has no options")]
    EventWithoutOptions(String),
    #[error("Event '{event}' has trigger month {month}, expected 1-12")]
    TriggerMonthOutOfRange { event: String, month: u8 },
    #[error("Event '{event}' declares option '{option}' twice")]
    DuplicateOption { event: String, option: String },
    #[error("Event '{event}' option '{option}' has {field} impact {value}, limit is ±{limit}")]
    ImpactOutOfRange {
        event: String,
        option: String,
        field: &'static str,
        value: i64,
        limit: i64,
    },
}

/// Immutable reference data supplied to the simulation at startup.
///
/// `events` is kept in declared order; the settlement engine scans it front
/// to back and the first eligible event wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub provinces: Vec<ProvinceDef>,
    #[serde(default)]
    pub officials: Vec<Official>,
    #[serde(default)]
    pub factions: Vec<Faction>,
    #[serde(default)]
    pub commanders: Vec<Warlord>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let mut commanders = builtin::ming_commanders();
        commanders.extend(builtin::qing_commanders());
        Self {
            provinces: builtin::provinces(),
            officials: builtin::officials(),
            factions: builtin::factions(),
            commanders,
            events: builtin::events(),
        }
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "Loaded catalog from {}: {} provinces, {} events",
            path.display(),
            catalog.provinces.len(),
            catalog.events.len()
        );
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut province_ids = HashSet::new();
        for province in &self.provinces {
            if !province_ids.insert(province.id.as_str()) {
                return Err(DataError::DuplicateProvince(province.id.clone()));
            }
        }

        let mut event_ids = HashSet::new();
        for event in &self.events {
            if !event_ids.insert(event.id.as_str()) {
                return Err(DataError::DuplicateEvent(event.id.clone()));
            }
            if !(1..=12).contains(&event.trigger_month) {
                return Err(DataError::TriggerMonthOutOfRange {
                    event: event.id.clone(),
                    month: event.trigger_month,
                });
            }
            if event.options.is_empty() {
                return Err(DataError::EventWithoutOptions(event.id.clone()));
            }
            let mut option_ids = HashSet::new();
            for option in &event.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(DataError::DuplicateOption {
                        event: event.id.clone(),
                        option: option.id.clone(),
                    });
                }
                let impact = &option.impact;
                for (field, value) in [
                    ("treasury", impact.treasury),
                    ("prestige", impact.prestige),
                    ("military", impact.military),
                ] {
                    let Some(value) = value else { continue };
                    if value.unsigned_abs() > MAX_IMPACT_MAGNITUDE.unsigned_abs() {
                        return Err(DataError::ImpactOutOfRange {
                            event: event.id.clone(),
                            option: option.id.clone(),
                            field,
                            value,
                            limit: MAX_IMPACT_MAGNITUDE,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn event(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn province(&self, id: &str) -> Option<&ProvinceDef> {
        self.provinces.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventImpact, EventOption};
    use std::io::Write;

    fn event(id: &str, month: u8, option_ids: &[&str]) -> EventDef {
        EventDef {
            id: id.to_string(),
            name: id.to_string(),
            trigger_month: month,
            background: String::new(),
            options: option_ids
                .iter()
                .map(|opt| EventOption {
                    id: opt.to_string(),
                    text: opt.to_string(),
                    impact_description: String::new(),
                    impact: EventImpact::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.officials.len(), 7);
        assert_eq!(catalog.commanders.len(), 9);
        assert!(catalog.event("EVENT_02").is_some());
        assert_eq!(catalog.province("pref-0").unwrap().name, "Yingtian");
    }

    #[test]
    fn test_rejects_duplicate_event_ids() {
        let mut catalog = Catalog::builtin();
        catalog.events.push(event("EVENT_01", 7, &["A"]));
        assert!(matches!(
            catalog.validate(),
            Err(DataError::DuplicateEvent(id)) if id == "EVENT_01"
        ));
    }

    #[test]
    fn test_rejects_event_without_options() {
        let mut catalog = Catalog::builtin();
        catalog.events.push(event("EVENT_03", 7, &[]));
        assert!(matches!(
            catalog.validate(),
            Err(DataError::EventWithoutOptions(_))
        ));
    }

    #[test]
    fn test_rejects_trigger_month_out_of_range() {
        let mut catalog = Catalog::builtin();
        catalog.events = vec![event("EVENT_13", 13, &["A"])];
        assert!(matches!(
            catalog.validate(),
            Err(DataError::TriggerMonthOutOfRange { month: 13, .. })
        ));

        catalog.events = vec![event("EVENT_00", 0, &["A"])];
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_option_ids() {
        let mut catalog = Catalog::builtin();
        catalog.events = vec![event("EVENT_03", 7, &["A", "B", "A"])];
        assert!(matches!(
            catalog.validate(),
            Err(DataError::DuplicateOption { option, .. }) if option == "A"
        ));
    }

    #[test]
    fn test_rejects_impact_out_of_range() {
        let mut catalog = Catalog::builtin();
        let mut oversized = event("EVENT_03", 7, &["A"]);
        oversized.options[0].impact.treasury = Some(1_000_000_000_000_000);
        catalog.events.push(oversized);
        assert!(matches!(
            catalog.validate(),
            Err(DataError::ImpactOutOfRange { field: "treasury", ref option, .. }) if option == "A"
        ));

        let mut catalog = Catalog::builtin();
        let mut drain = event("EVENT_03", 7, &["A"]);
        drain.options[0].impact.military = Some(i64::MIN);
        catalog.events.push(drain);
        assert!(matches!(
            catalog.validate(),
            Err(DataError::ImpactOutOfRange { field: "military", .. })
        ));

        let mut catalog = Catalog::builtin();
        let mut edge = event("EVENT_03", 7, &["A"]);
        edge.options[0].impact.prestige = Some(-MAX_IMPACT_MAGNITUDE);
        catalog.events.push(edge);
        catalog.validate().unwrap();
    }

    #[test]
    fn test_oversized_impact_json_fails_to_load() {
        let json = r#"{
            "provinces": [],
            "events": [{
                "id": "EVENT_09", "name": "Windfall", "trigger_month": 6, "background": "",
                "options": [{"id": "A", "text": "Accept", "impact_description": "",
                             "impact": {"treasury": 1000000000000000}}]
            }]
        }"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(DataError::ImpactOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_province_ids() {
        let mut catalog = Catalog::builtin();
        let first = catalog.provinces[0].clone();
        catalog.provinces.push(first);
        assert!(matches!(
            catalog.validate(),
            Err(DataError::DuplicateProvince(id)) if id == "pref-0"
        ));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let catalog = Catalog::builtin();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(catalog.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        let loaded = Catalog::load(file.path()).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_minimal_json_defaults_optional_sections() {
        let json = r#"{
            "provinces": [{"id": "p1", "name": "Test", "taxes": {"land": 1, "salt": 0, "merchant": 0, "maritime": 0, "misc": 0}}]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.provinces.len(), 1);
        assert!(catalog.events.is_empty());
        assert!(catalog.officials.is_empty());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Catalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Catalog::from_json_str("{ not json"),
            Err(DataError::Parse(_))
        ));
    }
}
