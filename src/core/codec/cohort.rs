//! Cohort, cohort membership and cohort evaluation codecs
//!
//! Cohort evaluation results come in two shapes:
//!
//! - static: `{"results": [{"cohort": {...}, "patient": {...}}, ...]}`, one
//!   row per member, each row naming the cohort
//! - dynamic: `{"definition": {"uuid": ..., "name": ...}, "members": [...]}`
//!
//! [`CohortDataCodec`] tries the static shape first (`results[0].cohort`),
//! then the dynamic one (`definition.uuid` and `members`). A payload matching
//! neither is reported and decodes to an empty [`CohortData`], or fails with
//! `UnresolvedShape` under strict mode.

use super::discriminator::{resolve, Attempt, Resolution};
use super::encode::{uuid_only, JsonObject};
use super::patient::PatientCodec;
use super::representations;
use super::{DeleteIdentity, Document, EntityCodec};
use crate::domain::{
    CodecError, CodecResult, Cohort, CohortData, CohortDefinition, CohortMember, JsonPath,
    Patient, PayloadShape, Timestamp,
};
use crate::logging::diagnostics::Diagnostic;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct CohortCodec;

impl EntityCodec for CohortCodec {
    type Entity = Cohort;
    const ENTITY: &'static str = "cohort";

    fn representation(&self) -> &'static str {
        representations::COHORT
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Cohort> {
        Ok(Cohort {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            dynamic: doc.flag("dynamic")?,
        })
    }

    fn encode_value(&self, cohort: &Cohort) -> Value {
        JsonObject::new()
            .field("uuid", cohort.uuid.as_str())
            .text("name", cohort.name.as_ref())
            .field("dynamic", cohort.dynamic)
            .build()
    }
}

/// Codec for cohort definitions
///
/// Definitions are only held locally as deletion placeholders, so encoding
/// writes the identity alone: `{"uuid": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortDefinitionCodec;

impl EntityCodec for CohortDefinitionCodec {
    type Entity = CohortDefinition;
    const ENTITY: &'static str = "cohort_definition";

    fn representation(&self) -> &'static str {
        representations::COHORT_DEFINITION
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<CohortDefinition> {
        Ok(CohortDefinition {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            description: doc.optional("description")?,
        })
    }

    fn encode_value(&self, definition: &CohortDefinition) -> Value {
        definition.encode_identity()
    }
}

impl DeleteIdentity for CohortDefinition {
    const IDENTITY_FIELDS: &'static [&'static str] = &["uuid"];

    fn encode_identity(&self) -> Value {
        uuid_only(&self.uuid)
    }
}

/// Codec for cohort memberships
///
/// Memberships are deletion placeholders: encoding writes
/// `{"cohort": {"uuid"}, "patient": {"uuid"}}` and drops the date added and
/// the patient details.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortMemberCodec {
    patient: PatientCodec,
}

impl EntityCodec for CohortMemberCodec {
    type Entity = CohortMember;
    const ENTITY: &'static str = "cohort_member";

    fn representation(&self) -> &'static str {
        representations::COHORT_MEMBER
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<CohortMember> {
        let cohort_uuid = doc.required(JsonPath::root().key("cohort").key("uuid"))?;
        let patient = self.patient.decode_nested(&doc.object("patient")?)?;
        Ok(CohortMember {
            cohort_uuid,
            patient_uuid: patient.uuid.clone(),
            date_added: doc.optional::<Timestamp>("dateAdded")?,
            patient: Some(patient),
        })
    }

    fn encode_value(&self, member: &CohortMember) -> Value {
        member.encode_identity()
    }
}

impl DeleteIdentity for CohortMember {
    const IDENTITY_FIELDS: &'static [&'static str] = &["cohort", "patient"];

    fn encode_identity(&self) -> Value {
        JsonObject::new()
            .reference("cohort", &self.cohort_uuid)
            .reference("patient", &self.patient_uuid)
            .build()
    }
}

/// Codec for cohort evaluation results, in either shape
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortDataCodec {
    cohort: CohortCodec,
    patient: PatientCodec,
}

impl CohortDataCodec {
    fn attempts(&self) -> [Attempt<'_, CohortData>; 2] {
        [
            Attempt::new(PayloadShape::Static, |doc| self.decode_static(doc))
                .requires(JsonPath::root().key("results").index(0).key("cohort")),
            Attempt::new(PayloadShape::Dynamic, |doc| self.decode_dynamic(doc))
                .requires(JsonPath::root().key("definition").key("uuid"))
                .requires("members"),
        ]
    }

    fn decode_static(&self, doc: &Document<'_>) -> CodecResult<CohortData> {
        let rows = doc.array("results")?;
        let mut cohort = None;
        let mut members = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            if index == 0 {
                cohort = Some(self.cohort.decode_nested(&row.object("cohort")?)?);
            }
            let Some(patient) = row.optional_object("patient")? else {
                continue;
            };
            let patient = self.patient.decode_nested(&patient)?;
            let cohort_uuid = cohort.as_ref().map(|c| c.uuid.as_str()).unwrap_or_default();
            members.push(CohortMember::synthesize(cohort_uuid, patient));
        }

        Ok(CohortData {
            cohort,
            members,
            shape: Some(PayloadShape::Static),
        })
    }

    fn decode_dynamic(&self, doc: &Document<'_>) -> CodecResult<CohortData> {
        let definition = doc.object("definition")?.for_entity(CohortDefinitionCodec::ENTITY);
        let cohort = Cohort {
            uuid: definition.required("uuid")?,
            name: definition.optional("name")?,
            dynamic: true,
        };

        let members = doc
            .array("members")?
            .iter()
            .map(|item| {
                self.patient
                    .decode_nested(item)
                    .map(|patient| CohortMember::synthesize(cohort.uuid.as_str(), patient))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(CohortData {
            cohort: Some(cohort),
            members,
            shape: Some(PayloadShape::Dynamic),
        })
    }

    fn encode_patients<'p>(&self, patients: impl Iterator<Item = &'p Patient>) -> Vec<Value> {
        patients.map(|p| self.patient.encode_value(p)).collect()
    }
}

impl EntityCodec for CohortDataCodec {
    type Entity = CohortData;
    const ENTITY: &'static str = "cohort_data";

    fn representation(&self) -> &'static str {
        representations::COHORT_DATA
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<CohortData> {
        match resolve(doc, &self.attempts())? {
            Resolution::Matched { value, .. } => Ok(value),
            Resolution::Unresolved => {
                if doc.context().is_strict() {
                    return Err(CodecError::UnresolvedShape {
                        entity: doc.entity(),
                    });
                }
                doc.context().report(Diagnostic::unresolved_shape(
                    doc.entity(),
                    "payload has neither results[0].cohort nor definition.uuid with members",
                ));
                Ok(CohortData::default())
            }
        }
    }

    /// Writes the canonical payload of the shape the data was decoded from
    ///
    /// Unresolved data encodes to `{}`.
    fn encode_value(&self, data: &CohortData) -> Value {
        match data.shape {
            Some(PayloadShape::Static) => {
                let cohort = data.cohort.as_ref().map(|c| self.cohort.encode_value(c));
                let mut rows: Vec<Value> = self
                    .encode_patients(data.patients())
                    .into_iter()
                    .map(|patient| {
                        JsonObject::new()
                            .object("cohort", cohort.clone())
                            .field("patient", patient)
                            .build()
                    })
                    .collect();
                if rows.is_empty() {
                    rows.push(JsonObject::new().object("cohort", cohort).build());
                }
                JsonObject::new().field("results", rows).build()
            }
            Some(PayloadShape::Dynamic) => {
                let definition = data.cohort.as_ref().map(|c| {
                    JsonObject::new()
                        .field("uuid", c.uuid.as_str())
                        .text("name", c.name.as_ref())
                        .build()
                });
                JsonObject::new()
                    .object("definition", definition)
                    .field("members", self.encode_patients(data.patients()))
                    .build()
            }
            None => JsonObject::new().build(),
        }
    }
}
