//! Trial content model and the fixed reagent catalogue.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reagents rendered for every reagent-table trial.
///
/// The displayed rows are always this catalogue, regardless of which subset
/// the backend's observation map actually contains; a catalogue reagent with
/// no backend entry reveals as empty text rather than erroring. This is the
/// fixed contract of the reveal UI, and the single source of truth for it.
pub const REAGENT_CATALOGUE: [&str; 8] = [
    "AgNO3",
    "Al(NO3)3",
    "Ca(NO3)2",
    "Fe(NO3)2",
    "KNO3",
    "SnCl2 in HCl",
    "Zn(NO3)2",
    "Cu(NO3)2",
];

/// One unit of lab observation data, as delivered by the backend.
///
/// The wire shape carries no explicit tag: a trial value is either a plain
/// string or an object of reagent -> observation entries. Untagged
/// deserialization discriminates by value shape, and anything else fails the
/// parse with an error instead of leaking a half-typed trial into a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrialContent {
    Text(String),
    ReagentTable(BTreeMap<String, String>),
}

impl TrialContent {
    pub fn is_table(&self) -> bool {
        matches!(self, TrialContent::ReagentTable(_))
    }

    /// Observation text for `reagent`; empty when the backend map lacks it,
    /// `None` for plain-text trials, which have no reagents at all.
    pub fn observation(&self, reagent: &str) -> Option<&str> {
        match self {
            TrialContent::Text(_) => None,
            TrialContent::ReagentTable(map) => {
                Some(map.get(reagent).map(String::as_str).unwrap_or(""))
            }
        }
    }
}

/// Display state of one reagent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReagentCell<'a> {
    /// Not yet clicked: render the neutral placeholder, never the real value.
    Hidden,
    /// Clicked: the backend observation, possibly empty.
    Revealed(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminates_variant_by_value_shape() {
        let text: TrialContent = serde_json::from_str(r#""clear solution""#).unwrap();
        assert_eq!(text, TrialContent::Text("clear solution".to_string()));

        let table: TrialContent = serde_json::from_str(r#"{"AgNO3":"precipitate"}"#).unwrap();
        assert!(table.is_table());
        assert_eq!(table.observation("AgNO3"), Some("precipitate"));
    }

    #[test]
    fn rejects_values_of_neither_shape() {
        let bad: Result<BTreeMap<String, TrialContent>, _> =
            serde_json::from_str(r#"{"Trial 1": 42}"#);
        assert!(bad.is_err());

        let bad: Result<BTreeMap<String, TrialContent>, _> =
            serde_json::from_str(r#"{"Trial 1": {"AgNO3": {"nested": true}}}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn absent_reagent_observes_empty() {
        let table: TrialContent = serde_json::from_str(r#"{"AgNO3":"precipitate"}"#).unwrap();
        assert_eq!(table.observation("KNO3"), Some(""));
    }

    #[test]
    fn text_trials_have_no_reagents() {
        let text = TrialContent::Text("bends easily".to_string());
        assert_eq!(text.observation("AgNO3"), None);
    }

    #[test]
    fn catalogue_holds_the_eight_fixed_reagents() {
        assert_eq!(REAGENT_CATALOGUE.len(), 8);
        assert!(REAGENT_CATALOGUE.contains(&"SnCl2 in HCl"));
        assert!(REAGENT_CATALOGUE.contains(&"Cu(NO3)2"));
    }
}
