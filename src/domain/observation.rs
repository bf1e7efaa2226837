//! Observations

use super::concept::{Concept, NumericValue};
use super::encounter::Encounter;
use super::person::Person;
use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A single recorded observation (vital sign, answer to a question, lab result)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub uuid: String,
    pub observation_datetime: Option<Timestamp>,
    pub concept: Option<Concept>,
    pub encounter: Option<Encounter>,
    pub person: Option<Person>,
    pub value_text: Option<String>,
    pub value_numeric: Option<NumericValue>,
    pub value_coded: Option<Concept>,
    pub value_datetime: Option<Timestamp>,
    pub comment: Option<String>,
    pub voided: bool,
}

impl Observation {
    /// Renders whichever value is set, for display
    ///
    /// Numeric values are rendered exactly as received; coded values use the
    /// answer concept's preferred name.
    pub fn value_as_string(&self) -> Option<String> {
        if let Some(numeric) = &self.value_numeric {
            return Some(numeric.to_string());
        }
        if let Some(coded) = &self.value_coded {
            return coded
                .preferred_name()
                .map(str::to_string)
                .or_else(|| Some(coded.uuid.clone()));
        }
        if let Some(datetime) = &self.value_datetime {
            return Some(datetime.to_rfc3339());
        }
        self.value_text.clone()
    }
}
