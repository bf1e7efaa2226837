//! Concept dictionary records
//!
//! Concepts refer to other concepts through their coded answers. Answers are
//! always decoded with a narrower shape than their container (no answers of
//! their own), so the graph stays finite.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Datatype name the server uses for numeric concepts
pub const NUMERIC_DATATYPE: &str = "Numeric";

/// Datatype name the server uses for coded concepts
pub const CODED_DATATYPE: &str = "Coded";

/// A dictionary concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub uuid: String,
    pub names: Vec<ConceptName>,
    pub concept_type: Option<ConceptType>,
    pub concept_class: Option<ConceptClass>,
    pub set: bool,
    /// True for numeric concepts; selects the wider wire shape
    pub is_numeric: bool,
    /// Measurement unit, numeric concepts only
    pub units: Option<String>,
    /// Whether decimal values are allowed, numeric concepts only
    pub precise: bool,
    pub answers: Vec<Concept>,
}

impl Concept {
    /// Returns the locale-preferred name, or the first one listed
    pub fn preferred_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|name| name.locale_preferred)
            .or_else(|| self.names.first())
            .and_then(|name| name.name.as_deref())
    }

    /// True when the concept's datatype is "Coded"
    pub fn is_coded(&self) -> bool {
        self.concept_type
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .is_some_and(|name| name == CODED_DATATYPE)
    }
}

/// One localized name of a concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptName {
    pub name: Option<String>,
    pub locale: Option<String>,
    pub locale_preferred: bool,
}

/// Concept datatype, e.g. "Numeric", "Coded", "Text"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptType {
    pub uuid: String,
    pub name: Option<String>,
}

/// Concept class, e.g. "Test", "Diagnosis"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptClass {
    pub uuid: String,
    pub name: Option<String>,
}

/// Precision-preserving numeric value
pub type NumericValue = Decimal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_name() {
        let concept = Concept {
            uuid: "c1".to_string(),
            names: vec![
                ConceptName {
                    name: Some("WEIGHT".to_string()),
                    locale: Some("en".to_string()),
                    locale_preferred: false,
                },
                ConceptName {
                    name: Some("Weight (kg)".to_string()),
                    locale: Some("en".to_string()),
                    locale_preferred: true,
                },
            ],
            ..Concept::default()
        };
        assert_eq!(concept.preferred_name(), Some("Weight (kg)"));
    }

    #[test]
    fn test_is_coded() {
        let mut concept = Concept {
            uuid: "c1".to_string(),
            concept_type: Some(ConceptType {
                uuid: "t1".to_string(),
                name: Some(CODED_DATATYPE.to_string()),
            }),
            ..Concept::default()
        };
        assert!(concept.is_coded());

        concept.concept_type = None;
        assert!(!concept.is_coded());
    }
}
