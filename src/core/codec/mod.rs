//! Entity/JSON codecs
//!
//! Every entity type has a codec translating between the server's JSON
//! representation and the typed record in [`crate::domain`]. Codecs are
//! stateless values; aggregate codecs hold the codecs of their nested entities
//! as fields and call them directly.
//!
//! ```
//! use clinsync::core::codec::{CodecContext, CohortCodec, EntityCodec};
//!
//! let context = CodecContext::default();
//! let raw = r#"{"uuid":"u1","name":"Flu Patients","dynamic":false}"#;
//!
//! let cohort = CohortCodec.decode(&context, raw).unwrap();
//! assert_eq!(cohort.name.as_deref(), Some("Flu Patients"));
//! assert!(!cohort.dynamic);
//! ```
//!
//! Decoding is tolerant of absent optional fields and strict on required
//! ones; see [`extract`] for the exact rules. Deletion placeholders implement
//! [`DeleteIdentity`], whose encoding carries only the fields the server needs
//! to find the row.

pub mod cohort;
pub mod concept;
pub mod discriminator;
pub mod encode;
pub mod encounter;
pub mod extract;
pub mod form;
pub mod kind;
pub mod observation;
pub mod patient;
pub mod person;
pub mod representations;
pub mod user;

pub use cohort::{CohortCodec, CohortDataCodec, CohortDefinitionCodec, CohortMemberCodec};
pub use concept::{ConceptClassCodec, ConceptCodec, ConceptNameCodec, ConceptTypeCodec};
pub use discriminator::{Attempt, Resolution};
pub use encounter::{EncounterCodec, EncounterTypeCodec, LocationCodec};
pub use extract::{Document, FieldValue, PathTrace};
pub use form::{FormCodec, FormDataCodec, FormTemplateCodec, TagCodec};
pub use kind::EntityKind;
pub use observation::ObservationCodec;
pub use patient::{PatientCodec, PatientIdentifierCodec, PatientIdentifierTypeCodec, PatientShape};
pub use person::{PersonAttributeCodec, PersonAttributeTypeCodec, PersonCodec, PersonNameCodec};
pub use user::{PrivilegeCodec, ProviderCodec, RoleCodec, UserCodec, UserRoleCodec};

use crate::config::{CodecConfig, Strictness};
use crate::domain::{CodecError, CodecResult};
use crate::logging::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use extract::parse_payload;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-call decode settings
///
/// Cheap to clone; the sink is shared.
#[derive(Clone)]
pub struct CodecContext {
    strictness: Strictness,
    sink: Arc<dyn DiagnosticSink>,
}

impl CodecContext {
    /// Permissive context reporting through `tracing`
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            sink: Arc::new(TracingSink),
        }
    }

    /// Strict context: malformed dates and unresolved shapes are errors
    pub fn strict() -> Self {
        Self::new(Strictness::Strict)
    }

    /// Context configured from the `[codec]` section
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.strictness)
    }

    /// Replaces the diagnostic sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// Hands a diagnostic to the sink
    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }
}

impl Default for CodecContext {
    fn default() -> Self {
        Self::new(Strictness::Permissive)
    }
}

impl fmt::Debug for CodecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecContext")
            .field("strictness", &self.strictness)
            .finish_non_exhaustive()
    }
}

/// Decode/encode pair for one entity type
///
/// Implementors provide [`decode_document`](EntityCodec::decode_document) and
/// [`encode_value`](EntityCodec::encode_value); the remaining methods are
/// derived from those two. Encode writes the same keys decode reads.
pub trait EntityCodec {
    /// The decoded record
    type Entity;

    /// Entity type name used in errors and diagnostics
    const ENTITY: &'static str;

    /// Representation spec requested from the server for this codec
    fn representation(&self) -> &'static str;

    /// Decodes a document already positioned on the entity's object
    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Self::Entity>;

    /// Encodes the entity as a JSON value
    fn encode_value(&self, entity: &Self::Entity) -> Value;

    /// Parses and decodes raw payload text
    ///
    /// # Errors
    ///
    /// `MalformedDocument` when the text is not a JSON object; otherwise any
    /// error raised for a required field.
    fn decode(&self, context: &CodecContext, raw: &str) -> CodecResult<Self::Entity> {
        let value = parse_payload(raw, Self::ENTITY)?;
        self.decode_value(context, &value)
    }

    /// Decodes an already parsed payload
    fn decode_value(&self, context: &CodecContext, value: &Value) -> CodecResult<Self::Entity> {
        let doc = Document::new(value, Self::ENTITY, context)?;
        self.decode_document(&doc)
    }

    /// Decodes a sub-object of another entity's document
    ///
    /// Errors raised below this point are attributed to this codec's entity.
    fn decode_nested(&self, doc: &Document<'_>) -> CodecResult<Self::Entity> {
        self.decode_document(&doc.for_entity(Self::ENTITY))
    }

    /// Decodes a list response, `{"results": [...]}`
    ///
    /// An absent `results` key yields an empty list.
    fn decode_list(&self, context: &CodecContext, raw: &str) -> CodecResult<Vec<Self::Entity>> {
        let value = parse_payload(raw, Self::ENTITY)?;
        let doc = Document::new(&value, Self::ENTITY, context)?;
        doc.array("results")?
            .iter()
            .map(|item| self.decode_document(item))
            .collect()
    }

    /// Encodes the entity as JSON text
    fn encode(&self, entity: &Self::Entity) -> CodecResult<String> {
        serde_json::to_string(&self.encode_value(entity)).map_err(|e| CodecError::Encode {
            entity: Self::ENTITY,
            reason: e.to_string(),
        })
    }
}

/// Reduced encoding used to delete a row on the server
///
/// The output carries exactly [`IDENTITY_FIELDS`](DeleteIdentity::IDENTITY_FIELDS)
/// at the top level and nothing else. It is not a round trip.
pub trait DeleteIdentity {
    /// Top-level keys of the identity encoding
    const IDENTITY_FIELDS: &'static [&'static str];

    /// Encodes the identity subset
    fn encode_identity(&self) -> Value;

    /// Identity encoding as JSON text
    fn identity_json(&self) -> String {
        self.encode_identity().to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared assertions for codec tests

    use super::*;
    use crate::domain::Representation;

    /// Decodes `payload` and checks every path read against the codec's
    /// representation spec
    pub(crate) fn decode_covered<C: EntityCodec>(codec: &C, payload: &Value) -> C::Entity {
        let context = CodecContext::default();
        let trace = PathTrace::new();
        let doc = Document::new(payload, C::ENTITY, &context)
            .unwrap()
            .traced(&trace);
        let entity = codec.decode_document(&doc).unwrap();

        let representation = Representation::parse(codec.representation()).unwrap();
        for path in trace.paths() {
            assert!(
                representation.covers(&path),
                "{} codec reads {path}, which {} does not request",
                C::ENTITY,
                codec.representation()
            );
        }
        entity
    }

    /// Asserts `encode(decode(payload)) == payload`
    pub(crate) fn assert_round_trip<C: EntityCodec>(codec: &C, payload: Value) {
        let entity = decode_covered(codec, &payload);
        assert_eq!(codec.encode_value(&entity), payload);
    }

    /// Asserts the identity encoding has exactly the declared keys
    pub(crate) fn assert_identity_minimal<T: DeleteIdentity>(entity: &T) {
        let encoded = entity.encode_identity();
        let mut keys: Vec<&str> = encoded
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = T::IDENTITY_FIELDS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
