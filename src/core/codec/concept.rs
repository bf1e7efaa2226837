//! Concept dictionary codecs
//!
//! Numeric concepts carry `units` and `precise` on top of the common concept
//! fields. Decode sets [`Concept::is_numeric`] from `datatype.name` and reads
//! `units`/`precise` only through [`ConceptCodec::numeric`], the one shape
//! that requests them. Encode branches on that flag, never on the shape of
//! whatever payload the concept came from. Answers are decoded with [`ConceptCodec::coded`], which reads
//! uuid and names only, so a concept's answers never have answers.

use super::encode::JsonObject;
use super::representations;
use super::{Document, EntityCodec};
use crate::domain::concept::NUMERIC_DATATYPE;
use crate::domain::{CodecResult, Concept, ConceptClass, ConceptName, ConceptType};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptNameCodec;

impl EntityCodec for ConceptNameCodec {
    type Entity = ConceptName;
    const ENTITY: &'static str = "concept_name";

    fn representation(&self) -> &'static str {
        representations::CONCEPT_NAME
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<ConceptName> {
        Ok(ConceptName {
            name: doc.optional("name")?,
            locale: doc.optional("locale")?,
            locale_preferred: doc.flag("localePreferred")?,
        })
    }

    fn encode_value(&self, name: &ConceptName) -> Value {
        JsonObject::new()
            .text("name", name.name.as_ref())
            .text("locale", name.locale.as_ref())
            .field("localePreferred", name.locale_preferred)
            .build()
    }
}

/// Codec for a concept's datatype
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptTypeCodec;

impl EntityCodec for ConceptTypeCodec {
    type Entity = ConceptType;
    const ENTITY: &'static str = "concept_datatype";

    fn representation(&self) -> &'static str {
        representations::CONCEPT_TYPE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<ConceptType> {
        Ok(ConceptType {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
        })
    }

    fn encode_value(&self, concept_type: &ConceptType) -> Value {
        JsonObject::new()
            .field("uuid", concept_type.uuid.as_str())
            .text("name", concept_type.name.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptClassCodec;

impl EntityCodec for ConceptClassCodec {
    type Entity = ConceptClass;
    const ENTITY: &'static str = "concept_class";

    fn representation(&self) -> &'static str {
        representations::CONCEPT_CLASS
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<ConceptClass> {
        Ok(ConceptClass {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
        })
    }

    fn encode_value(&self, concept_class: &ConceptClass) -> Value {
        JsonObject::new()
            .field("uuid", concept_class.uuid.as_str())
            .text("name", concept_class.name.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConceptShape {
    Standard,
    Numeric,
    Coded,
}

/// Codec for concepts
#[derive(Debug, Clone, Copy)]
pub struct ConceptCodec {
    shape: ConceptShape,
    name: ConceptNameCodec,
    datatype: ConceptTypeCodec,
    class: ConceptClassCodec,
}

impl Default for ConceptCodec {
    fn default() -> Self {
        Self::numeric()
    }
}

impl ConceptCodec {
    fn with_shape(shape: ConceptShape) -> Self {
        Self {
            shape,
            name: ConceptNameCodec,
            datatype: ConceptTypeCodec,
            class: ConceptClassCodec,
        }
    }

    /// Common concept fields
    pub fn standard() -> Self {
        Self::with_shape(ConceptShape::Standard)
    }

    /// Common fields plus `units` and `precise`; the download default
    pub fn numeric() -> Self {
        Self::with_shape(ConceptShape::Numeric)
    }

    /// Uuid and names only, used for coded answers and coded values
    pub fn coded() -> Self {
        Self::with_shape(ConceptShape::Coded)
    }

    /// Narrowest representation that carries everything `concept` holds
    pub fn representation_for(concept: &Concept) -> &'static str {
        if concept.is_numeric {
            representations::NUMERIC_CONCEPT
        } else {
            representations::CONCEPT
        }
    }

    fn names(&self, doc: &Document<'_>) -> CodecResult<Vec<ConceptName>> {
        doc.array("names")?
            .iter()
            .map(|item| self.name.decode_nested(item))
            .collect()
    }
}

impl EntityCodec for ConceptCodec {
    type Entity = Concept;
    const ENTITY: &'static str = "concept";

    fn representation(&self) -> &'static str {
        match self.shape {
            ConceptShape::Standard => representations::CONCEPT,
            ConceptShape::Numeric => representations::NUMERIC_CONCEPT,
            ConceptShape::Coded => representations::CODED_CONCEPT,
        }
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Concept> {
        let mut concept = Concept {
            uuid: doc.required("uuid")?,
            names: self.names(doc)?,
            ..Concept::default()
        };
        if self.shape == ConceptShape::Coded {
            return Ok(concept);
        }

        concept.set = doc.flag("set")?;
        concept.concept_type = doc
            .optional_object("datatype")?
            .map(|nested| self.datatype.decode_nested(&nested))
            .transpose()?;
        concept.concept_class = doc
            .optional_object("conceptClass")?
            .map(|nested| self.class.decode_nested(&nested))
            .transpose()?;

        let answers = Self::coded();
        concept.answers = doc
            .array("answers")?
            .iter()
            .map(|item| answers.decode_nested(item))
            .collect::<CodecResult<_>>()?;

        concept.is_numeric = concept
            .concept_type
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .is_some_and(|name| name == NUMERIC_DATATYPE);
        if concept.is_numeric && self.shape == ConceptShape::Numeric {
            concept.units = doc.optional("units")?;
            concept.precise = doc.flag("precise")?;
        }
        Ok(concept)
    }

    fn encode_value(&self, concept: &Concept) -> Value {
        let object = JsonObject::new()
            .field("uuid", concept.uuid.as_str())
            .array("names", &concept.names, |n| self.name.encode_value(n));
        if self.shape == ConceptShape::Coded {
            return object.build();
        }

        let answers = Self::coded();
        let object = object
            .field("set", concept.set)
            .object(
                "datatype",
                concept
                    .concept_type
                    .as_ref()
                    .map(|t| self.datatype.encode_value(t)),
            )
            .object(
                "conceptClass",
                concept
                    .concept_class
                    .as_ref()
                    .map(|c| self.class.encode_value(c)),
            )
            .array("answers", &concept.answers, |a| answers.encode_value(a));

        if concept.is_numeric {
            object
                .text("units", concept.units.as_ref())
                .field("precise", concept.precise)
                .build()
        } else {
            object.build()
        }
    }
}
