//! Patient codecs
//!
//! Patients arrive in two wire shapes depending on which representation the
//! owning request asked for:
//!
//! - [`PatientShape::Standard`]: `names`, `identifiers` and `attributes`
//!   arrays, as returned by patient downloads and cohort evaluations
//! - [`PatientShape::Simple`]: the preferred name and identifier flattened
//!   into dotted keys (`personName.givenName`, `patientIdentifier.identifier`),
//!   as embedded in encounters
//!
//! The shape is fixed by the codec instance, never guessed from the payload.

use super::encode::JsonObject;
use super::person::PersonCodec;
use super::representations;
use super::{Document, EntityCodec};
use crate::domain::{
    CodecResult, Patient, PatientIdentifier, PatientIdentifierType, PersonName, Timestamp,
};
use serde_json::Value;

const GIVEN_NAME: &str = "personName.givenName";
const MIDDLE_NAME: &str = "personName.middleName";
const FAMILY_NAME: &str = "personName.familyName";
const IDENTIFIER: &str = "patientIdentifier.identifier";

/// Wire shape of a patient object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientShape {
    #[default]
    Standard,
    Simple,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatientIdentifierTypeCodec;

impl EntityCodec for PatientIdentifierTypeCodec {
    type Entity = PatientIdentifierType;
    const ENTITY: &'static str = "patient_identifier_type";

    fn representation(&self) -> &'static str {
        representations::PATIENT_IDENTIFIER_TYPE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<PatientIdentifierType> {
        Ok(PatientIdentifierType {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            format: doc.optional("format")?,
        })
    }

    fn encode_value(&self, identifier_type: &PatientIdentifierType) -> Value {
        JsonObject::new()
            .field("uuid", identifier_type.uuid.as_str())
            .text("name", identifier_type.name.as_ref())
            .text("format", identifier_type.format.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatientIdentifierCodec {
    identifier_type: PatientIdentifierTypeCodec,
}

impl EntityCodec for PatientIdentifierCodec {
    type Entity = PatientIdentifier;
    const ENTITY: &'static str = "patient_identifier";

    fn representation(&self) -> &'static str {
        representations::PATIENT_IDENTIFIER
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<PatientIdentifier> {
        let identifier_type = doc
            .optional_object("identifierType")?
            .map(|nested| self.identifier_type.decode_nested(&nested))
            .transpose()?;
        Ok(PatientIdentifier {
            identifier: doc.optional("identifier")?,
            preferred: doc.flag("preferred")?,
            identifier_type,
        })
    }

    fn encode_value(&self, identifier: &PatientIdentifier) -> Value {
        JsonObject::new()
            .text("identifier", identifier.identifier.as_ref())
            .field("preferred", identifier.preferred)
            .object(
                "identifierType",
                identifier
                    .identifier_type
                    .as_ref()
                    .map(|t| self.identifier_type.encode_value(t)),
            )
            .build()
    }
}

/// Codec for patients, in either wire shape
#[derive(Debug, Clone, Copy, Default)]
pub struct PatientCodec {
    shape: PatientShape,
    person: PersonCodec,
    identifier: PatientIdentifierCodec,
}

impl PatientCodec {
    /// Array-based shape
    pub fn standard() -> Self {
        Self::default()
    }

    /// Flattened shape embedded in encounters
    pub fn simple() -> Self {
        Self {
            shape: PatientShape::Simple,
            ..Self::default()
        }
    }

    pub fn shape(&self) -> PatientShape {
        self.shape
    }

    fn decode_standard(&self, doc: &Document<'_>, patient: &mut Patient) -> CodecResult<()> {
        patient.birthdate_estimated = doc.flag("birthdateEstimated")?;
        patient.voided = doc.flag("voided")?;
        patient.names = self.person.names(doc)?;
        patient.identifiers = doc
            .array("identifiers")?
            .iter()
            .map(|item| self.identifier.decode_nested(item))
            .collect::<CodecResult<_>>()?;
        patient.attributes = self.person.attributes(doc)?;
        Ok(())
    }

    fn decode_simple(&self, doc: &Document<'_>, patient: &mut Patient) -> CodecResult<()> {
        let name = PersonName {
            given_name: doc.optional(GIVEN_NAME)?,
            middle_name: doc.optional(MIDDLE_NAME)?,
            family_name: doc.optional(FAMILY_NAME)?,
            preferred: true,
        };
        if name.given_name.is_some() || name.middle_name.is_some() || name.family_name.is_some()
        {
            patient.names.push(name);
        }
        if let Some(identifier) = doc.optional::<String>(IDENTIFIER)? {
            patient.identifiers.push(PatientIdentifier {
                identifier: Some(identifier),
                preferred: true,
                identifier_type: None,
            });
        }
        Ok(())
    }

    fn encode_standard(&self, patient: &Patient, object: JsonObject) -> JsonObject {
        object
            .field("birthdateEstimated", patient.birthdate_estimated)
            .field("voided", patient.voided)
            .array("names", &patient.names, |n| self.person.encode_name(n))
            .array("identifiers", &patient.identifiers, |i| {
                self.identifier.encode_value(i)
            })
            .array("attributes", &patient.attributes, |a| {
                self.person.encode_attribute(a)
            })
    }

    fn encode_simple(&self, patient: &Patient, object: JsonObject) -> JsonObject {
        let name = patient.preferred_name();
        object
            .text(GIVEN_NAME, name.and_then(|n| n.given_name.as_ref()))
            .text(MIDDLE_NAME, name.and_then(|n| n.middle_name.as_ref()))
            .text(FAMILY_NAME, name.and_then(|n| n.family_name.as_ref()))
            .text(
                IDENTIFIER,
                patient
                    .preferred_identifier()
                    .and_then(|i| i.identifier.as_ref()),
            )
    }
}

impl EntityCodec for PatientCodec {
    type Entity = Patient;
    const ENTITY: &'static str = "patient";

    fn representation(&self) -> &'static str {
        match self.shape {
            PatientShape::Standard => representations::PATIENT,
            PatientShape::Simple => representations::SIMPLE_PATIENT,
        }
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Patient> {
        let mut patient = Patient {
            uuid: doc.required("uuid")?,
            gender: doc.optional("gender")?,
            birthdate: doc.optional::<Timestamp>("birthdate")?,
            ..Patient::default()
        };
        match self.shape {
            PatientShape::Standard => self.decode_standard(doc, &mut patient)?,
            PatientShape::Simple => self.decode_simple(doc, &mut patient)?,
        }
        Ok(patient)
    }

    fn encode_value(&self, patient: &Patient) -> Value {
        let object = JsonObject::new()
            .field("uuid", patient.uuid.as_str())
            .text("gender", patient.gender.as_ref())
            .timestamp("birthdate", patient.birthdate.as_ref());
        let object = match self.shape {
            PatientShape::Standard => self.encode_standard(patient, object),
            PatientShape::Simple => self.encode_simple(patient, object),
        };
        object.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::testing::{assert_round_trip, decode_covered};
    use crate::core::codec::CodecContext;
    use serde_json::json;

    fn standard_payload() -> Value {
        json!({
            "uuid": "P1",
            "gender": "M",
            "birthdate": "1975-07-01T00:00:00.000+0000",
            "birthdateEstimated": true,
            "voided": false,
            "names": [{"givenName": "Baraka", "familyName": "Mwangi", "preferred": true}],
            "identifiers": [{
                "identifier": "MRN-0042",
                "preferred": true,
                "identifierType": {"uuid": "it-1", "name": "OpenMRS ID", "format": "\\d+-\\d"}
            }],
            "attributes": [{
                "value": "Nairobi",
                "attributeType": {"uuid": "at-2", "name": "Birthplace"}
            }]
        })
    }

    #[test]
    fn test_standard_round_trip() {
        assert_round_trip(&PatientCodec::standard(), standard_payload());
    }

    #[test]
    fn test_standard_helpers() {
        let patient = decode_covered(&PatientCodec::standard(), &standard_payload());
        assert_eq!(patient.display_name(), "Baraka Mwangi");
        assert_eq!(patient.identifier("openmrs id"), Some("MRN-0042"));
        assert_eq!(patient.attribute("Birthplace"), Some("Nairobi"));
        assert!(patient.birthdate_estimated);
    }

    #[test]
    fn test_simple_shape_reads_flattened_keys() {
        let payload = json!({
            "uuid": "P1",
            "gender": "F",
            "personName.givenName": "Wanjiru",
            "personName.familyName": "Kamau",
            "patientIdentifier.identifier": "MRN-7"
        });
        let patient = decode_covered(&PatientCodec::simple(), &payload);
        assert_eq!(patient.display_name(), "Wanjiru Kamau");
        assert_eq!(
            patient.preferred_identifier().and_then(|i| i.identifier.as_deref()),
            Some("MRN-7")
        );
        assert_round_trip(&PatientCodec::simple(), payload);
    }

    #[test]
    fn test_simple_shape_ignores_nested_objects() {
        let payload = json!({"uuid": "P1", "personName": {"givenName": "Nested"}});
        let patient = decode_covered(&PatientCodec::simple(), &payload);
        assert!(patient.names.is_empty());
    }

    #[test]
    fn test_minimal_patient() {
        let patient = PatientCodec::standard()
            .decode(&CodecContext::default(), r#"{"uuid":"P9"}"#)
            .unwrap();
        assert_eq!(patient.uuid, "P9");
        assert!(!patient.voided);
        assert!(patient.names.is_empty());
        assert!(patient.identifiers.is_empty());
        assert_eq!(patient.display_name(), "");
    }

    #[test]
    fn test_representation_follows_shape() {
        assert_eq!(
            PatientCodec::standard().representation(),
            representations::PATIENT
        );
        assert_eq!(
            PatientCodec::simple().representation(),
            representations::SIMPLE_PATIENT
        );
    }
}
