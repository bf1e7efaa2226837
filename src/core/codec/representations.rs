//! Representation spec constants
//!
//! One constant per codec shape. Each aggregate's spec embeds the spec of
//! every nested entity it decodes, so the constants are composed at compile
//! time and can never drift from the nested codec's own spec.
//!
//! ```
//! use clinsync::core::codec::representations::{ENCOUNTER, LOCATION};
//!
//! assert!(ENCOUNTER.contains(&format!("location:{LOCATION}")));
//! ```

macro_rules! location {
    () => {
        "(uuid,name,description,address1,cityVillage,country)"
    };
}

macro_rules! encounter_type {
    () => {
        "(uuid,name)"
    };
}

macro_rules! person_name {
    () => {
        "(givenName,middleName,familyName,preferred)"
    };
}

macro_rules! person_attribute_type {
    () => {
        "(uuid,name,format)"
    };
}

macro_rules! person_attribute {
    () => {
        concat!("(value,attributeType:", person_attribute_type!(), ")")
    };
}

macro_rules! patient_identifier_type {
    () => {
        "(uuid,name,format)"
    };
}

macro_rules! patient_identifier {
    () => {
        concat!(
            "(identifier,preferred,identifierType:",
            patient_identifier_type!(),
            ")"
        )
    };
}

macro_rules! person {
    () => {
        concat!(
            "(uuid,gender,birthdate,names:",
            person_name!(),
            ",attributes:",
            person_attribute!(),
            ")"
        )
    };
}

macro_rules! patient {
    () => {
        concat!(
            "(uuid,gender,birthdate,birthdateEstimated,voided,names:",
            person_name!(),
            ",identifiers:",
            patient_identifier!(),
            ",attributes:",
            person_attribute!(),
            ")"
        )
    };
}

macro_rules! simple_patient {
    () => {
        "(uuid,gender,birthdate,personName.givenName,personName.middleName,personName.familyName,patientIdentifier.identifier)"
    };
}

macro_rules! encounter {
    () => {
        concat!(
            "(uuid,encounterDatetime,voided,form:(uuid),patient:",
            simple_patient!(),
            ",provider:",
            person!(),
            ",location:",
            location!(),
            ",encounterType:",
            encounter_type!(),
            ")"
        )
    };
}

macro_rules! concept_name {
    () => {
        "(name,locale,localePreferred)"
    };
}

macro_rules! concept_type {
    () => {
        "(uuid,name)"
    };
}

macro_rules! concept_class {
    () => {
        "(uuid,name)"
    };
}

macro_rules! coded_concept {
    () => {
        concat!("(uuid,names:", concept_name!(), ")")
    };
}

macro_rules! concept_fields {
    () => {
        concat!(
            "uuid,set,names:",
            concept_name!(),
            ",datatype:",
            concept_type!(),
            ",conceptClass:",
            concept_class!(),
            ",answers:",
            coded_concept!()
        )
    };
}

macro_rules! numeric_concept {
    () => {
        concat!("(", concept_fields!(), ",units,precise)")
    };
}

macro_rules! cohort {
    () => {
        "(uuid,name,dynamic)"
    };
}

macro_rules! privilege {
    () => {
        "(uuid,name,description)"
    };
}

macro_rules! role {
    () => {
        concat!("(uuid,name,privileges:", privilege!(), ")")
    };
}

macro_rules! tag {
    () => {
        "(uuid,name)"
    };
}

pub const LOCATION: &str = location!();
pub const ENCOUNTER_TYPE: &str = encounter_type!();
pub const PERSON_NAME: &str = person_name!();
pub const PERSON_ATTRIBUTE_TYPE: &str = person_attribute_type!();
pub const PERSON_ATTRIBUTE: &str = person_attribute!();
pub const PERSON: &str = person!();
pub const PATIENT_IDENTIFIER_TYPE: &str = patient_identifier_type!();
pub const PATIENT_IDENTIFIER: &str = patient_identifier!();

/// Full patient shape with name, identifier and attribute arrays
pub const PATIENT: &str = patient!();

/// Flattened patient shape embedded in encounters
///
/// Carries the preferred name and identifier as flattened-dotted keys.
pub const SIMPLE_PATIENT: &str = simple_patient!();

pub const ENCOUNTER: &str = encounter!();

pub const CONCEPT_NAME: &str = concept_name!();
pub const CONCEPT_TYPE: &str = concept_type!();
pub const CONCEPT_CLASS: &str = concept_class!();

/// Answer concepts: uuid and names only, no answers of their own
pub const CODED_CONCEPT: &str = coded_concept!();

pub const CONCEPT: &str = concat!("(", concept_fields!(), ")");

/// Concept shape with the numeric-only `units` and `precise` fields
pub const NUMERIC_CONCEPT: &str = numeric_concept!();

pub const OBSERVATION: &str = concat!(
    "(uuid,obsDatetime,valueText,valueNumeric,valueDatetime,comment,voided,concept:",
    numeric_concept!(),
    ",encounter:",
    encounter!(),
    ",person:",
    person!(),
    ",valueCoded:",
    coded_concept!(),
    ")"
);

pub const COHORT: &str = cohort!();
pub const COHORT_DEFINITION: &str = "(uuid,name,description)";
pub const COHORT_MEMBER: &str = concat!("(dateAdded,cohort:(uuid),patient:", patient!(), ")");

/// Static cohort evaluation: one row per member, each naming the cohort
pub const STATIC_COHORT_DATA: &str =
    concat!("(results:(cohort:", cohort!(), ",patient:", patient!(), "))");

/// Dynamic cohort evaluation: the definition plus a flat member list
pub const DYNAMIC_COHORT_DATA: &str = concat!("(definition:(uuid,name),members:", patient!(), ")");

/// Either cohort evaluation shape
pub const COHORT_DATA: &str = concat!(
    "(results:(cohort:",
    cohort!(),
    ",patient:",
    patient!(),
    "),definition:(uuid,name),members:",
    patient!(),
    ")"
);

pub const TAG: &str = tag!();
pub const FORM: &str = concat!(
    "(uuid,name,description,discriminator,version,retired,tags:",
    tag!(),
    ")"
);
pub const FORM_TEMPLATE: &str = "(uuid,html,model,modelJson)";
pub const FORM_DATA: &str = "(uuid,payload,xmlPayload,status,templateUuid,patientUuid,userUuid,discriminator,dateCreated,encounterDate)";

pub const PRIVILEGE: &str = privilege!();
pub const ROLE: &str = role!();
pub const USER: &str = concat!(
    "(uuid,username,systemId,person:",
    person!(),
    ",roles:",
    role!(),
    ",privileges:",
    privilege!(),
    ")"
);
pub const USER_ROLE: &str = "(user:(uuid),role:(uuid))";
pub const PROVIDER: &str = concat!("(uuid,name,identifier,person:", person!(), ")");
