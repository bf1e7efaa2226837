//! Patient records

use super::person::{find_attribute, PersonAttribute, PersonName};
use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A patient: a person with clinical identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub uuid: String,
    pub gender: Option<String>,
    pub birthdate: Option<Timestamp>,
    pub birthdate_estimated: bool,
    pub voided: bool,
    pub names: Vec<PersonName>,
    pub identifiers: Vec<PatientIdentifier>,
    pub attributes: Vec<PersonAttribute>,
}

impl Patient {
    /// Returns the preferred name, or the first one listed
    pub fn preferred_name(&self) -> Option<&PersonName> {
        self.names
            .iter()
            .find(|name| name.preferred)
            .or_else(|| self.names.first())
    }

    /// Name shown in patient lists; empty when the patient has no name
    pub fn display_name(&self) -> String {
        self.preferred_name()
            .map(PersonName::full_name)
            .unwrap_or_default()
    }

    /// Returns the identifier whose type has the given name
    pub fn identifier(&self, type_name: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|identifier| {
                identifier
                    .identifier_type
                    .as_ref()
                    .and_then(|t| t.name.as_deref())
                    .is_some_and(|name| name.eq_ignore_ascii_case(type_name))
            })
            .and_then(|identifier| identifier.identifier.as_deref())
    }

    /// Returns the preferred identifier, or the first one listed
    pub fn preferred_identifier(&self) -> Option<&PatientIdentifier> {
        self.identifiers
            .iter()
            .find(|identifier| identifier.preferred)
            .or_else(|| self.identifiers.first())
    }

    /// Returns the value of the attribute whose type has the given name
    pub fn attribute(&self, type_name: &str) -> Option<&str> {
        find_attribute(&self.attributes, type_name)
    }
}

/// A clinical identifier such as a medical record number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentifier {
    pub identifier: Option<String>,
    pub preferred: bool,
    pub identifier_type: Option<PatientIdentifierType>,
}

/// Identifier type, e.g. "OpenMRS ID"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentifierType {
    pub uuid: String,
    pub name: Option<String>,
    pub format: Option<String>,
}
