//! Person and demographic records

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A person known to the server (providers, users, the demographic half of a patient)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub uuid: String,
    pub gender: Option<String>,
    pub birthdate: Option<Timestamp>,
    pub names: Vec<PersonName>,
    pub attributes: Vec<PersonAttribute>,
}

impl Person {
    /// Returns the preferred name, or the first one listed
    pub fn preferred_name(&self) -> Option<&PersonName> {
        self.names
            .iter()
            .find(|name| name.preferred)
            .or_else(|| self.names.first())
    }

    /// Returns the value of the attribute whose type has the given name
    pub fn attribute(&self, type_name: &str) -> Option<&str> {
        find_attribute(&self.attributes, type_name)
    }
}

/// One name of a person
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
    pub preferred: bool,
}

impl PersonName {
    /// Joins the non-empty name parts with single spaces
    pub fn full_name(&self) -> String {
        [&self.given_name, &self.middle_name, &self.family_name]
            .into_iter()
            .flatten()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Typed free-form attribute attached to a person
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAttribute {
    pub value: Option<String>,
    pub attribute_type: Option<PersonAttributeType>,
}

/// Person attribute type, e.g. "Telephone Number"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAttributeType {
    pub uuid: String,
    pub name: Option<String>,
    pub format: Option<String>,
}

pub(crate) fn find_attribute<'a>(
    attributes: &'a [PersonAttribute],
    type_name: &str,
) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| {
            attribute
                .attribute_type
                .as_ref()
                .and_then(|t| t.name.as_deref())
                .is_some_and(|name| name.eq_ignore_ascii_case(type_name))
        })
        .and_then(|attribute| attribute.value.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(given: &str, family: &str, preferred: bool) -> PersonName {
        PersonName {
            given_name: Some(given.to_string()),
            middle_name: None,
            family_name: Some(family.to_string()),
            preferred,
        }
    }

    #[test]
    fn test_preferred_name_falls_back_to_first() {
        let mut person = Person {
            uuid: "p1".to_string(),
            names: vec![name("Ada", "Byron", false), name("Ada", "Lovelace", true)],
            ..Person::default()
        };
        assert_eq!(
            person.preferred_name().and_then(|n| n.family_name.as_deref()),
            Some("Lovelace")
        );

        person.names[1].preferred = false;
        assert_eq!(
            person.preferred_name().and_then(|n| n.family_name.as_deref()),
            Some("Byron")
        );
    }

    #[test]
    fn test_full_name_skips_blank_parts() {
        let name = PersonName {
            given_name: Some("Grace".to_string()),
            middle_name: Some("  ".to_string()),
            family_name: Some("Hopper".to_string()),
            preferred: true,
        };
        assert_eq!(name.full_name(), "Grace Hopper");
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let person = Person {
            uuid: "p1".to_string(),
            attributes: vec![PersonAttribute {
                value: Some("0712 345678".to_string()),
                attribute_type: Some(PersonAttributeType {
                    uuid: "t1".to_string(),
                    name: Some("Telephone Number".to_string()),
                    format: None,
                }),
            }],
            ..Person::default()
        };
        assert_eq!(person.attribute("telephone number"), Some("0712 345678"));
        assert_eq!(person.attribute("Email"), None);
    }
}
