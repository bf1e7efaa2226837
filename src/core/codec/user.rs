//! User, role, privilege and provider codecs

use super::encode::JsonObject;
use super::person::PersonCodec;
use super::representations;
use super::{DeleteIdentity, Document, EntityCodec};
use crate::domain::{CodecResult, JsonPath, Privilege, Provider, Role, User, UserRole};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeCodec;

impl EntityCodec for PrivilegeCodec {
    type Entity = Privilege;
    const ENTITY: &'static str = "privilege";

    fn representation(&self) -> &'static str {
        representations::PRIVILEGE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Privilege> {
        Ok(Privilege {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            description: doc.optional("description")?,
        })
    }

    fn encode_value(&self, privilege: &Privilege) -> Value {
        JsonObject::new()
            .field("uuid", privilege.uuid.as_str())
            .text("name", privilege.name.as_ref())
            .text("description", privilege.description.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCodec {
    privilege: PrivilegeCodec,
}

impl RoleCodec {
    fn privileges(&self, doc: &Document<'_>) -> CodecResult<Vec<Privilege>> {
        doc.array("privileges")?
            .iter()
            .map(|item| self.privilege.decode_nested(item))
            .collect()
    }
}

impl EntityCodec for RoleCodec {
    type Entity = Role;
    const ENTITY: &'static str = "role";

    fn representation(&self) -> &'static str {
        representations::ROLE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Role> {
        Ok(Role {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            privileges: self.privileges(doc)?,
        })
    }

    fn encode_value(&self, role: &Role) -> Value {
        JsonObject::new()
            .field("uuid", role.uuid.as_str())
            .text("name", role.name.as_ref())
            .array("privileges", &role.privileges, |p| {
                self.privilege.encode_value(p)
            })
            .build()
    }
}

/// Codec for user accounts
///
/// A blank or absent `username` is replaced by `systemId`, as the server
/// leaves `username` empty for accounts that log in with their system id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserCodec {
    person: PersonCodec,
    role: RoleCodec,
    privilege: PrivilegeCodec,
}

impl EntityCodec for UserCodec {
    type Entity = User;
    const ENTITY: &'static str = "user";

    fn representation(&self) -> &'static str {
        representations::USER
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<User> {
        let system_id: Option<String> = doc.optional("systemId")?;
        let username = doc
            .optional::<String>("username")?
            .filter(|name| !name.trim().is_empty())
            .or_else(|| system_id.clone());

        let person = doc
            .optional_object("person")?
            .map(|nested| self.person.decode_nested(&nested))
            .transpose()?;
        let roles = doc
            .array("roles")?
            .iter()
            .map(|item| self.role.decode_nested(item))
            .collect::<CodecResult<_>>()?;
        let privileges = doc
            .array("privileges")?
            .iter()
            .map(|item| self.privilege.decode_nested(item))
            .collect::<CodecResult<_>>()?;

        Ok(User {
            uuid: doc.required("uuid")?,
            username,
            system_id,
            person,
            roles,
            privileges,
        })
    }

    fn encode_value(&self, user: &User) -> Value {
        JsonObject::new()
            .field("uuid", user.uuid.as_str())
            .text("username", user.username.as_ref())
            .text("systemId", user.system_id.as_ref())
            .object(
                "person",
                user.person.as_ref().map(|p| self.person.encode_value(p)),
            )
            .array("roles", &user.roles, |r| self.role.encode_value(r))
            .array("privileges", &user.privileges, |p| {
                self.privilege.encode_value(p)
            })
            .build()
    }
}

/// Codec for user-role assignments
///
/// Assignments are deletion placeholders: the encoding is the identity,
/// `{"user": {"uuid"}, "role": {"uuid"}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRoleCodec;

impl EntityCodec for UserRoleCodec {
    type Entity = UserRole;
    const ENTITY: &'static str = "user_role";

    fn representation(&self) -> &'static str {
        representations::USER_ROLE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<UserRole> {
        Ok(UserRole {
            user_uuid: doc.required(JsonPath::root().key("user").key("uuid"))?,
            role_uuid: doc.required(JsonPath::root().key("role").key("uuid"))?,
        })
    }

    fn encode_value(&self, user_role: &UserRole) -> Value {
        user_role.encode_identity()
    }
}

impl DeleteIdentity for UserRole {
    const IDENTITY_FIELDS: &'static [&'static str] = &["user", "role"];

    fn encode_identity(&self) -> Value {
        JsonObject::new()
            .reference("user", &self.user_uuid)
            .reference("role", &self.role_uuid)
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderCodec {
    person: PersonCodec,
}

impl EntityCodec for ProviderCodec {
    type Entity = Provider;
    const ENTITY: &'static str = "provider";

    fn representation(&self) -> &'static str {
        representations::PROVIDER
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Provider> {
        let person = doc
            .optional_object("person")?
            .map(|nested| self.person.decode_nested(&nested))
            .transpose()?;
        Ok(Provider {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            identifier: doc.optional("identifier")?,
            person,
        })
    }

    fn encode_value(&self, provider: &Provider) -> Value {
        JsonObject::new()
            .field("uuid", provider.uuid.as_str())
            .text("name", provider.name.as_ref())
            .text("identifier", provider.identifier.as_ref())
            .object(
                "person",
                provider.person.as_ref().map(|p| self.person.encode_value(p)),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::testing::{
        assert_identity_minimal, assert_round_trip, decode_covered,
    };
    use crate::core::codec::CodecContext;
    use serde_json::json;
    use test_case::test_case;

    fn user_payload() -> Value {
        json!({
            "uuid": "user-1",
            "username": "nurse.jane",
            "systemId": "3-4",
            "person": {"uuid": "person-1", "gender": "F"},
            "roles": [{
                "uuid": "role-1",
                "name": "Data Clerk",
                "privileges": [{"uuid": "priv-1", "name": "View Patients", "description": "Able to view patients"}]
            }],
            "privileges": [{"uuid": "priv-2", "name": "Add Observations"}]
        })
    }

    #[test]
    fn test_user_round_trip() {
        assert_round_trip(&UserCodec::default(), user_payload());
    }

    #[test]
    fn test_user_privileges_through_roles() {
        let user = decode_covered(&UserCodec::default(), &user_payload());
        assert!(user.has_privilege("View Patients"));
        assert!(user.has_privilege("Add Observations"));
        assert!(!user.has_privilege("Delete Patients"));
    }

    #[test_case(r#"{"uuid":"u","username":"","systemId":"admin"}"#, Some("admin"); "blank username")]
    #[test_case(r#"{"uuid":"u","username":"   ","systemId":"admin"}"#, Some("admin"); "whitespace username")]
    #[test_case(r#"{"uuid":"u","systemId":"admin"}"#, Some("admin"); "absent username")]
    #[test_case(r#"{"uuid":"u","username":"jdoe","systemId":"admin"}"#, Some("jdoe"); "username present")]
    #[test_case(r#"{"uuid":"u","username":""}"#, None; "nothing to fall back to")]
    fn test_username_falls_back_to_system_id(raw: &str, expected: Option<&str>) {
        let user = UserCodec::default()
            .decode(&CodecContext::default(), raw)
            .unwrap();
        assert_eq!(user.username.as_deref(), expected);
    }

    #[test]
    fn test_privilege_encodes_its_own_name() {
        let privilege = Privilege {
            uuid: "priv-1".to_string(),
            name: Some("View Patients".to_string()),
            description: None,
        };
        assert_eq!(
            PrivilegeCodec.encode_value(&privilege),
            json!({"uuid": "priv-1", "name": "View Patients"})
        );
    }

    #[test]
    fn test_user_role_identity() {
        let user_role = decode_covered(
            &UserRoleCodec,
            &json!({"user": {"uuid": "user-1"}, "role": {"uuid": "role-1"}}),
        );
        assert_identity_minimal(&user_role);
        assert_eq!(
            UserRoleCodec.encode_value(&user_role),
            json!({"user": {"uuid": "user-1"}, "role": {"uuid": "role-1"}})
        );
    }

    #[test]
    fn test_provider_round_trip() {
        assert_round_trip(
            &ProviderCodec::default(),
            json!({
                "uuid": "prov-1",
                "name": "Dr. Kiprop",
                "identifier": "PRV-9",
                "person": {"uuid": "person-9", "names": [{"givenName": "Kiprop", "preferred": true}]}
            }),
        );
    }
}
