//! Person, person name and person attribute codecs

use super::encode::JsonObject;
use super::representations;
use super::{Document, EntityCodec};
use crate::domain::{
    CodecResult, Person, PersonAttribute, PersonAttributeType, PersonName, Timestamp,
};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonNameCodec;

impl EntityCodec for PersonNameCodec {
    type Entity = PersonName;
    const ENTITY: &'static str = "person_name";

    fn representation(&self) -> &'static str {
        representations::PERSON_NAME
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<PersonName> {
        Ok(PersonName {
            given_name: doc.optional("givenName")?,
            middle_name: doc.optional("middleName")?,
            family_name: doc.optional("familyName")?,
            preferred: doc.flag("preferred")?,
        })
    }

    fn encode_value(&self, name: &PersonName) -> Value {
        JsonObject::new()
            .text("givenName", name.given_name.as_ref())
            .text("middleName", name.middle_name.as_ref())
            .text("familyName", name.family_name.as_ref())
            .field("preferred", name.preferred)
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonAttributeTypeCodec;

impl EntityCodec for PersonAttributeTypeCodec {
    type Entity = PersonAttributeType;
    const ENTITY: &'static str = "person_attribute_type";

    fn representation(&self) -> &'static str {
        representations::PERSON_ATTRIBUTE_TYPE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<PersonAttributeType> {
        Ok(PersonAttributeType {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            format: doc.optional("format")?,
        })
    }

    fn encode_value(&self, attribute_type: &PersonAttributeType) -> Value {
        JsonObject::new()
            .field("uuid", attribute_type.uuid.as_str())
            .text("name", attribute_type.name.as_ref())
            .text("format", attribute_type.format.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonAttributeCodec {
    attribute_type: PersonAttributeTypeCodec,
}

impl EntityCodec for PersonAttributeCodec {
    type Entity = PersonAttribute;
    const ENTITY: &'static str = "person_attribute";

    fn representation(&self) -> &'static str {
        representations::PERSON_ATTRIBUTE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<PersonAttribute> {
        let attribute_type = doc
            .optional_object("attributeType")?
            .map(|nested| self.attribute_type.decode_nested(&nested))
            .transpose()?;
        Ok(PersonAttribute {
            value: doc.optional("value")?,
            attribute_type,
        })
    }

    fn encode_value(&self, attribute: &PersonAttribute) -> Value {
        JsonObject::new()
            .text("value", attribute.value.as_ref())
            .object(
                "attributeType",
                attribute
                    .attribute_type
                    .as_ref()
                    .map(|t| self.attribute_type.encode_value(t)),
            )
            .build()
    }
}

/// Codec for persons (providers, users' demographics)
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonCodec {
    name: PersonNameCodec,
    attribute: PersonAttributeCodec,
}

impl EntityCodec for PersonCodec {
    type Entity = Person;
    const ENTITY: &'static str = "person";

    fn representation(&self) -> &'static str {
        representations::PERSON
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Person> {
        Ok(Person {
            uuid: doc.required("uuid")?,
            gender: doc.optional("gender")?,
            birthdate: doc.optional::<Timestamp>("birthdate")?,
            names: self.names(doc)?,
            attributes: self.attributes(doc)?,
        })
    }

    fn encode_value(&self, person: &Person) -> Value {
        JsonObject::new()
            .field("uuid", person.uuid.as_str())
            .text("gender", person.gender.as_ref())
            .timestamp("birthdate", person.birthdate.as_ref())
            .array("names", &person.names, |n| self.name.encode_value(n))
            .array("attributes", &person.attributes, |a| {
                self.attribute.encode_value(a)
            })
            .build()
    }
}

impl PersonCodec {
    /// Decodes the `names` array; patients share the same shape
    pub(crate) fn names(&self, doc: &Document<'_>) -> CodecResult<Vec<PersonName>> {
        doc.array("names")?
            .iter()
            .map(|item| self.name.decode_nested(item))
            .collect()
    }

    /// Decodes the `attributes` array; patients share the same shape
    pub(crate) fn attributes(&self, doc: &Document<'_>) -> CodecResult<Vec<PersonAttribute>> {
        doc.array("attributes")?
            .iter()
            .map(|item| self.attribute.decode_nested(item))
            .collect()
    }

    pub(crate) fn encode_name(&self, name: &PersonName) -> Value {
        self.name.encode_value(name)
    }

    pub(crate) fn encode_attribute(&self, attribute: &PersonAttribute) -> Value {
        self.attribute.encode_value(attribute)
    }
}
