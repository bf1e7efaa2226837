//! Encounter, encounter type and location codecs

use super::encode::{uuid_only, JsonObject};
use super::patient::PatientCodec;
use super::person::PersonCodec;
use super::representations;
use super::{Document, EntityCodec};
use crate::domain::{CodecResult, Encounter, EncounterType, JsonPath, Location, Timestamp};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocationCodec;

impl EntityCodec for LocationCodec {
    type Entity = Location;
    const ENTITY: &'static str = "location";

    fn representation(&self) -> &'static str {
        representations::LOCATION
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Location> {
        Ok(Location {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            description: doc.optional("description")?,
            address1: doc.optional("address1")?,
            city_village: doc.optional("cityVillage")?,
            country: doc.optional("country")?,
        })
    }

    fn encode_value(&self, location: &Location) -> Value {
        JsonObject::new()
            .field("uuid", location.uuid.as_str())
            .text("name", location.name.as_ref())
            .text("description", location.description.as_ref())
            .text("address1", location.address1.as_ref())
            .text("cityVillage", location.city_village.as_ref())
            .text("country", location.country.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterTypeCodec;

impl EntityCodec for EncounterTypeCodec {
    type Entity = EncounterType;
    const ENTITY: &'static str = "encounter_type";

    fn representation(&self) -> &'static str {
        representations::ENCOUNTER_TYPE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<EncounterType> {
        Ok(EncounterType {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
        })
    }

    fn encode_value(&self, encounter_type: &EncounterType) -> Value {
        JsonObject::new()
            .field("uuid", encounter_type.uuid.as_str())
            .text("name", encounter_type.name.as_ref())
            .build()
    }
}

/// Codec for encounters
///
/// Nested objects are decoded in a fixed order: patient (simple shape),
/// provider, location, encounter type. The first failing nested object stops
/// the decode.
#[derive(Debug, Clone, Copy)]
pub struct EncounterCodec {
    patient: PatientCodec,
    provider: PersonCodec,
    location: LocationCodec,
    encounter_type: EncounterTypeCodec,
}

impl Default for EncounterCodec {
    fn default() -> Self {
        Self {
            patient: PatientCodec::simple(),
            provider: PersonCodec::default(),
            location: LocationCodec,
            encounter_type: EncounterTypeCodec,
        }
    }
}

impl EntityCodec for EncounterCodec {
    type Entity = Encounter;
    const ENTITY: &'static str = "encounter";

    fn representation(&self) -> &'static str {
        representations::ENCOUNTER
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Encounter> {
        let mut encounter = Encounter {
            uuid: doc.required("uuid")?,
            encounter_datetime: doc.optional::<Timestamp>("encounterDatetime")?,
            voided: doc.flag("voided")?,
            form_uuid: doc.optional(JsonPath::root().key("form").key("uuid"))?,
            ..Encounter::default()
        };

        if let Some(patient) = doc.optional_object("patient")? {
            encounter.patient = Some(self.patient.decode_nested(&patient)?);
        }
        if let Some(provider) = doc.optional_object("provider")? {
            encounter.provider = Some(self.provider.decode_nested(&provider)?);
        }
        if let Some(location) = doc.optional_object("location")? {
            encounter.location = Some(self.location.decode_nested(&location)?);
        }
        if let Some(encounter_type) = doc.optional_object("encounterType")? {
            encounter.encounter_type = Some(self.encounter_type.decode_nested(&encounter_type)?);
        }
        Ok(encounter)
    }

    fn encode_value(&self, encounter: &Encounter) -> Value {
        JsonObject::new()
            .field("uuid", encounter.uuid.as_str())
            .timestamp("encounterDatetime", encounter.encounter_datetime.as_ref())
            .field("voided", encounter.voided)
            .object("form", encounter.form_uuid.as_deref().map(uuid_only))
            .object(
                "patient",
                encounter.patient.as_ref().map(|p| self.patient.encode_value(p)),
            )
            .object(
                "provider",
                encounter.provider.as_ref().map(|p| self.provider.encode_value(p)),
            )
            .object(
                "location",
                encounter.location.as_ref().map(|l| self.location.encode_value(l)),
            )
            .object(
                "encounterType",
                encounter
                    .encounter_type
                    .as_ref()
                    .map(|t| self.encounter_type.encode_value(t)),
            )
            .build()
    }
}
