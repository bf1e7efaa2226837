//! Domain models and types for clinsync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity records** ([`Patient`], [`Encounter`], [`Observation`], [`Cohort`], ...):
//!   plain data aggregates identified by a uuid, created fresh on every decode
//! - **Path expressions** ([`JsonPath`]) used to address fields in server payloads
//! - **Representation specs** ([`Representation`]) naming the shape requested
//!   from the server
//! - **Error types** ([`ClinsyncError`], [`CodecError`]) and result aliases
//!
//! # Entity Graph
//!
//! Records reference each other without back-references:
//!
//! - `Observation` → `Concept`, `Encounter`, `Person`
//! - `Encounter` → `Patient`, `Person` (provider), `Location`, `EncounterType`
//! - `CohortMember` → cohort uuid, `Patient`
//! - `Concept` → answer `Concept`s, decoded one level deep only
//!
//! ```rust
//! use clinsync::domain::{Cohort, Identified};
//!
//! let cohort = Cohort {
//!     uuid: "u1".to_string(),
//!     name: Some("Flu Patients".to_string()),
//!     dynamic: false,
//! };
//! assert_eq!(cohort.uuid(), "u1");
//! ```

pub mod cohort;
pub mod concept;
pub mod encounter;
pub mod errors;
pub mod form;
pub mod observation;
pub mod path;
pub mod patient;
pub mod person;
pub mod representation;
pub mod result;
pub mod user;

// Re-export commonly used types for convenience
pub use cohort::{Cohort, CohortData, CohortDefinition, CohortMember, PayloadShape};
pub use concept::{Concept, ConceptClass, ConceptName, ConceptType, NumericValue};
pub use encounter::{Encounter, EncounterType, Location};
pub use errors::{ClinsyncError, CodecError, TransportError};
pub use form::{Form, FormData, FormTemplate, Tag};
pub use observation::Observation;
pub use path::JsonPath;
pub use patient::{Patient, PatientIdentifier, PatientIdentifierType};
pub use person::{Person, PersonAttribute, PersonAttributeType, PersonName};
pub use representation::Representation;
pub use result::{CodecResult, Result};
pub use user::{Privilege, Provider, Role, User, UserRole};

/// Date-time as sent by the server, offset preserved
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

/// Records with a stable identity the local store can key on
pub trait Identified {
    /// Returns the identity key
    fn uuid(&self) -> &str;
}

macro_rules! identified_by_uuid {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl Identified for $entity {
                fn uuid(&self) -> &str {
                    &self.uuid
                }
            }
        )+
    };
}

identified_by_uuid!(
    Cohort,
    CohortDefinition,
    Concept,
    ConceptClass,
    ConceptType,
    Encounter,
    EncounterType,
    Form,
    FormData,
    FormTemplate,
    Location,
    Observation,
    Patient,
    PatientIdentifierType,
    Person,
    PersonAttributeType,
    Privilege,
    Provider,
    Role,
    Tag,
    User,
);
