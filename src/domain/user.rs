//! Users, roles, privileges and providers

use super::person::Person;
use serde::{Deserialize, Serialize};

/// An account on the clinical-record server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    /// Login name; holds the system id when the server sent a blank username
    pub username: Option<String>,
    pub system_id: Option<String>,
    pub person: Option<Person>,
    pub roles: Vec<Role>,
    pub privileges: Vec<Privilege>,
}

impl User {
    /// True when the privilege is granted directly or through a role
    pub fn has_privilege(&self, name: &str) -> bool {
        let matches = |privilege: &Privilege| privilege.name.as_deref() == Some(name);
        self.privileges.iter().any(matches)
            || self
                .roles
                .iter()
                .any(|role| role.privileges.iter().any(matches))
    }
}

/// A named bundle of privileges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub uuid: String,
    pub name: Option<String>,
    pub privileges: Vec<Privilege>,
}

/// A single permission, e.g. "View Patients"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    pub uuid: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Assignment of a role to a user
///
/// Held locally only as a deletion placeholder; its encoding carries the two
/// uuids alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub user_uuid: String,
    pub role_uuid: String,
}

/// A person authorized to record encounters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub uuid: String,
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub person: Option<Person>,
}
