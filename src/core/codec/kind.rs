//! Entity kinds known to the codec layer
//!
//! [`EntityKind`] names every codec by a stable string, for the command line
//! and for callers that pick a codec at runtime.

use super::{
    CodecContext, CohortCodec, CohortDataCodec, CohortDefinitionCodec, CohortMemberCodec,
    ConceptClassCodec, ConceptCodec, ConceptNameCodec, ConceptTypeCodec, EncounterCodec,
    EncounterTypeCodec, EntityCodec, FormCodec, FormDataCodec, FormTemplateCodec,
    LocationCodec, ObservationCodec, PatientCodec, PatientIdentifierCodec,
    PatientIdentifierTypeCodec, PersonAttributeCodec, PersonAttributeTypeCodec, PersonCodec,
    PersonNameCodec, PrivilegeCodec, ProviderCodec, RoleCodec, TagCodec, UserCodec,
    UserRoleCodec,
};
use crate::domain::representation::RepresentationError;
use crate::domain::{CodecError, CodecResult, Representation};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

macro_rules! entity_kinds {
    ($($variant:ident => $name:literal, $resource:expr, $codec:expr;)+) => {
        /// Every entity type with a codec
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EntityKind {
            $($variant,)+
        }

        impl EntityKind {
            /// All kinds, in declaration order
            pub const ALL: &'static [EntityKind] = &[$(EntityKind::$variant,)+];

            /// Stable snake_case name
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// REST resource the kind is downloaded from, relative to the
            /// base URL; `None` for kinds only ever embedded in others
            pub fn resource(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => $resource,)+
                }
            }

            /// Representation spec requested for this kind
            pub fn representation(self) -> &'static str {
                match self {
                    $(Self::$variant => $codec.representation(),)+
                }
            }

            /// Decodes `raw` as this kind and re-encodes it
            ///
            /// # Errors
            ///
            /// Any decode error for the payload.
            pub fn transcode(self, context: &CodecContext, raw: &str) -> CodecResult<Transcoded> {
                match self {
                    $(Self::$variant => transcode(&$codec, context, raw),)+
                }
            }
        }
    };
}

entity_kinds! {
    Cohort => "cohort", Some("cohort"), CohortCodec;
    CohortDefinition => "cohort_definition", Some("reportingrest/cohortDefinition"), CohortDefinitionCodec;
    CohortMember => "cohort_member", Some("cohortmembership"), CohortMemberCodec::default();
    CohortData => "cohort_data", Some("reportingrest/cohort"), CohortDataCodec::default();
    Concept => "concept", Some("concept"), ConceptCodec::numeric();
    ConceptName => "concept_name", None, ConceptNameCodec;
    ConceptDatatype => "concept_datatype", Some("conceptdatatype"), ConceptTypeCodec;
    ConceptClass => "concept_class", Some("conceptclass"), ConceptClassCodec;
    Encounter => "encounter", Some("encounter"), EncounterCodec::default();
    EncounterType => "encounter_type", Some("encountertype"), EncounterTypeCodec;
    Location => "location", Some("location"), LocationCodec;
    Observation => "observation", Some("obs"), ObservationCodec::default();
    Patient => "patient", Some("patient"), PatientCodec::standard();
    SimplePatient => "simple_patient", None, PatientCodec::simple();
    PatientIdentifier => "patient_identifier", None, PatientIdentifierCodec::default();
    PatientIdentifierType => "patient_identifier_type", Some("patientidentifiertype"), PatientIdentifierTypeCodec;
    Person => "person", Some("person"), PersonCodec::default();
    PersonName => "person_name", None, PersonNameCodec;
    PersonAttribute => "person_attribute", None, PersonAttributeCodec::default();
    PersonAttributeType => "person_attribute_type", Some("personattributetype"), PersonAttributeTypeCodec;
    Form => "form", Some("form"), FormCodec::default();
    Tag => "tag", Some("formtag"), TagCodec;
    FormTemplate => "form_template", Some("formtemplate"), FormTemplateCodec;
    FormData => "form_data", Some("formdata"), FormDataCodec;
    User => "user", Some("user"), UserCodec::default();
    Role => "role", Some("role"), RoleCodec::default();
    Privilege => "privilege", Some("privilege"), PrivilegeCodec;
    UserRole => "user_role", None, UserRoleCodec;
    Provider => "provider", Some("provider"), ProviderCodec::default();
}

impl EntityKind {
    /// Parsed representation spec for this kind
    pub fn parsed_representation(self) -> Result<Representation, RepresentationError> {
        Representation::parse(self.representation())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts `cohort_data`, `cohort-data`, `CohortData` and `cohortdata`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().replace('_', "") == wanted)
            .ok_or_else(|| format!("Unknown entity kind '{s}'"))
    }
}

/// A decoded payload and its re-encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcoded {
    /// The decoded record, serialized field by field
    pub entity: Value,
    /// The codec's encoding of the record
    pub encoded: Value,
}

fn transcode<C>(codec: &C, context: &CodecContext, raw: &str) -> CodecResult<Transcoded>
where
    C: EntityCodec,
    C::Entity: Serialize,
{
    let decoded = codec.decode(context, raw)?;
    let entity = serde_json::to_value(&decoded).map_err(|e| CodecError::Encode {
        entity: C::ENTITY,
        reason: e.to_string(),
    })?;
    Ok(Transcoded {
        entity,
        encoded: codec.encode_value(&decoded),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::representations;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("cohort_data", EntityKind::CohortData; "snake case")]
    #[test_case("cohort-data", EntityKind::CohortData; "kebab case")]
    #[test_case("CohortData", EntityKind::CohortData; "camel case")]
    #[test_case("userrole", EntityKind::UserRole; "concatenated")]
    fn test_parse_kind(input: &str, expected: EntityKind) {
        assert_eq!(input.parse::<EntityKind>(), Ok(expected));
    }

    #[test]
    fn test_unknown_kind() {
        assert!("visit".parse::<EntityKind>().is_err());
        assert!("obs".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_names_are_unique_and_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.name().parse::<EntityKind>(), Ok(*kind));
        }
        assert_eq!(EntityKind::ALL.len(), 29);
    }

    #[test]
    fn test_every_representation_parses() {
        for kind in EntityKind::ALL {
            assert!(kind.parsed_representation().is_ok(), "{kind}");
        }
        assert_eq!(
            EntityKind::Observation.representation(),
            representations::OBSERVATION
        );
        assert_eq!(
            EntityKind::SimplePatient
                .parsed_representation()
                .unwrap()
                .to_string(),
            representations::SIMPLE_PATIENT
        );
    }

    #[test]
    fn test_transcode_cohort() {
        let transcoded = EntityKind::Cohort
            .transcode(
                &CodecContext::default(),
                r#"{"uuid":"u1","name":"Flu Patients","dynamic":false}"#,
            )
            .unwrap();
        assert_eq!(transcoded.entity["name"], json!("Flu Patients"));
        assert_eq!(
            transcoded.encoded,
            json!({"uuid": "u1", "name": "Flu Patients", "dynamic": false})
        );
    }
}
