//! Observation codec

use super::concept::ConceptCodec;
use super::encode::JsonObject;
use super::encounter::EncounterCodec;
use super::person::PersonCodec;
use super::representations;
use super::{Document, EntityCodec};
use crate::domain::{CodecResult, NumericValue, Observation, Timestamp};
use serde_json::Value;

/// Codec for observations
///
/// Nested objects are decoded in order: concept (numeric shape), encounter,
/// person, then the coded value (coded shape).
#[derive(Debug, Clone, Copy)]
pub struct ObservationCodec {
    concept: ConceptCodec,
    encounter: EncounterCodec,
    person: PersonCodec,
    coded_value: ConceptCodec,
}

impl Default for ObservationCodec {
    fn default() -> Self {
        Self {
            concept: ConceptCodec::numeric(),
            encounter: EncounterCodec::default(),
            person: PersonCodec::default(),
            coded_value: ConceptCodec::coded(),
        }
    }
}

impl EntityCodec for ObservationCodec {
    type Entity = Observation;
    const ENTITY: &'static str = "observation";

    fn representation(&self) -> &'static str {
        representations::OBSERVATION
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Observation> {
        let mut observation = Observation {
            uuid: doc.required("uuid")?,
            observation_datetime: doc.optional::<Timestamp>("obsDatetime")?,
            value_text: doc.optional("valueText")?,
            value_numeric: doc.optional::<NumericValue>("valueNumeric")?,
            value_datetime: doc.optional::<Timestamp>("valueDatetime")?,
            comment: doc.optional("comment")?,
            voided: doc.flag("voided")?,
            ..Observation::default()
        };

        if let Some(concept) = doc.optional_object("concept")? {
            observation.concept = Some(self.concept.decode_nested(&concept)?);
        }
        if let Some(encounter) = doc.optional_object("encounter")? {
            observation.encounter = Some(self.encounter.decode_nested(&encounter)?);
        }
        if let Some(person) = doc.optional_object("person")? {
            observation.person = Some(self.person.decode_nested(&person)?);
        }
        if let Some(coded) = doc.optional_object("valueCoded")? {
            observation.value_coded = Some(self.coded_value.decode_nested(&coded)?);
        }
        Ok(observation)
    }

    fn encode_value(&self, observation: &Observation) -> Value {
        JsonObject::new()
            .field("uuid", observation.uuid.as_str())
            .timestamp("obsDatetime", observation.observation_datetime.as_ref())
            .text("valueText", observation.value_text.as_ref())
            .decimal("valueNumeric", observation.value_numeric.as_ref())
            .timestamp("valueDatetime", observation.value_datetime.as_ref())
            .text("comment", observation.comment.as_ref())
            .field("voided", observation.voided)
            .object(
                "concept",
                observation
                    .concept
                    .as_ref()
                    .map(|c| self.concept.encode_value(c)),
            )
            .object(
                "encounter",
                observation
                    .encounter
                    .as_ref()
                    .map(|e| self.encounter.encode_value(e)),
            )
            .object(
                "person",
                observation
                    .person
                    .as_ref()
                    .map(|p| self.person.encode_value(p)),
            )
            .object(
                "valueCoded",
                observation
                    .value_coded
                    .as_ref()
                    .map(|c| self.coded_value.encode_value(c)),
            )
            .build()
    }
}
