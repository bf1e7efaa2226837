//! Encounters, encounter types and locations

use super::patient::Patient;
use super::person::Person;
use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A clinical encounter: one visit of a patient, recorded by a provider at a location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub uuid: String,
    pub encounter_datetime: Option<Timestamp>,
    pub voided: bool,
    /// Uuid of the form the encounter was captured with
    pub form_uuid: Option<String>,
    pub patient: Option<Patient>,
    pub provider: Option<Person>,
    pub location: Option<Location>,
    pub encounter_type: Option<EncounterType>,
}

/// Encounter type, e.g. "Adult Initial"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterType {
    pub uuid: String,
    pub name: Option<String>,
}

/// A facility or ward
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uuid: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address1: Option<String>,
    pub city_village: Option<String>,
    pub country: Option<String>,
}
