//! Form, tag, form template and form data codecs

use super::encode::{uuid_only, JsonObject};
use super::representations;
use super::{DeleteIdentity, Document, EntityCodec};
use crate::domain::{CodecResult, Form, FormData, FormTemplate, Tag, Timestamp};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct TagCodec;

impl EntityCodec for TagCodec {
    type Entity = Tag;
    const ENTITY: &'static str = "tag";

    fn representation(&self) -> &'static str {
        representations::TAG
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Tag> {
        Ok(Tag {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
        })
    }

    fn encode_value(&self, tag: &Tag) -> Value {
        JsonObject::new()
            .field("uuid", tag.uuid.as_str())
            .text("name", tag.name.as_ref())
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec {
    tag: TagCodec,
}

impl EntityCodec for FormCodec {
    type Entity = Form;
    const ENTITY: &'static str = "form";

    fn representation(&self) -> &'static str {
        representations::FORM
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<Form> {
        let tags = doc
            .array("tags")?
            .iter()
            .map(|item| self.tag.decode_nested(item))
            .collect::<CodecResult<_>>()?;
        Ok(Form {
            uuid: doc.required("uuid")?,
            name: doc.optional("name")?,
            description: doc.optional("description")?,
            discriminator: doc.optional("discriminator")?,
            version: doc.optional("version")?,
            retired: doc.flag("retired")?,
            tags,
        })
    }

    fn encode_value(&self, form: &Form) -> Value {
        JsonObject::new()
            .field("uuid", form.uuid.as_str())
            .text("name", form.name.as_ref())
            .text("description", form.description.as_ref())
            .text("discriminator", form.discriminator.as_ref())
            .text("version", form.version.as_ref())
            .field("retired", form.retired)
            .array("tags", &form.tags, |t| self.tag.encode_value(t))
            .build()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormTemplateCodec;

impl EntityCodec for FormTemplateCodec {
    type Entity = FormTemplate;
    const ENTITY: &'static str = "form_template";

    fn representation(&self) -> &'static str {
        representations::FORM_TEMPLATE
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<FormTemplate> {
        Ok(FormTemplate {
            uuid: doc.required("uuid")?,
            html: doc.optional("html")?,
            model: doc.optional("model")?,
            model_json: doc.optional("modelJson")?,
        })
    }

    fn encode_value(&self, template: &FormTemplate) -> Value {
        JsonObject::new()
            .field("uuid", template.uuid.as_str())
            .text("html", template.html.as_ref())
            .text("model", template.model.as_ref())
            .text("modelJson", template.model_json.as_ref())
            .build()
    }
}

/// Codec for captured form data
///
/// Uploads use the full encoding; deleting an upload uses the identity
/// encoding, `{"uuid": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDataCodec;

impl EntityCodec for FormDataCodec {
    type Entity = FormData;
    const ENTITY: &'static str = "form_data";

    fn representation(&self) -> &'static str {
        representations::FORM_DATA
    }

    fn decode_document(&self, doc: &Document<'_>) -> CodecResult<FormData> {
        Ok(FormData {
            uuid: doc.required("uuid")?,
            payload: doc.optional("payload")?,
            xml_payload: doc.optional("xmlPayload")?,
            status: doc.optional("status")?,
            template_uuid: doc.optional("templateUuid")?,
            patient_uuid: doc.optional("patientUuid")?,
            user_uuid: doc.optional("userUuid")?,
            discriminator: doc.optional("discriminator")?,
            date_created: doc.optional::<Timestamp>("dateCreated")?,
            encounter_date: doc.optional::<Timestamp>("encounterDate")?,
        })
    }

    fn encode_value(&self, data: &FormData) -> Value {
        JsonObject::new()
            .field("uuid", data.uuid.as_str())
            .text("payload", data.payload.as_ref())
            .text("xmlPayload", data.xml_payload.as_ref())
            .text("status", data.status.as_ref())
            .text("templateUuid", data.template_uuid.as_ref())
            .text("patientUuid", data.patient_uuid.as_ref())
            .text("userUuid", data.user_uuid.as_ref())
            .text("discriminator", data.discriminator.as_ref())
            .timestamp("dateCreated", data.date_created.as_ref())
            .timestamp("encounterDate", data.encounter_date.as_ref())
            .build()
    }
}

impl DeleteIdentity for FormData {
    const IDENTITY_FIELDS: &'static [&'static str] = &["uuid"];

    fn encode_identity(&self) -> Value {
        uuid_only(&self.uuid)
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

    fn form_data_payload() -> Value {
        json!({
            "uuid": "fd-1",
            "payload": "{\"encounter\":{}}",
            "status": "complete",
            "templateUuid": "ft-1",
            "patientUuid": "P1",
            "userUuid": "user-1",
            "discriminator": "json-encounter",
            "dateCreated": "2016-09-12T14:30:00.000+0300",
            "encounterDate": "2016-09-12T00:00:00.000+0300"
        })
    }

    #[test]
    fn test_form_round_trip_with_tags() {
        let payload = json!({
            "uuid": "f-1",
            "name": "Adult Return Visit",
            "description": "Follow-up form",
            "discriminator": "json-encounter",
            "version": "1.2",
            "retired": false,
            "tags": [{"uuid": "t-1", "name": "HIV"}, {"uuid": "t-2", "name": "Adult"}]
        });
        assert_round_trip(&FormCodec::default(), payload.clone());

        let form = decode_covered(&FormCodec::default(), &payload);
        assert!(form.has_tag("hiv"));
        assert!(!form.has_tag("Pediatric"));
    }

    #[test]
    fn test_form_template_round_trip() {
        assert_round_trip(
            &FormTemplateCodec,
            json!({"uuid": "ft-1", "html": "<form></form>", "model": "<model/>", "modelJson": "{}"}),
        );
    }

    #[test]
    fn test_form_data_round_trip() {
        assert_round_trip(&FormDataCodec, form_data_payload());
    }

    #[test]
    fn test_form_data_identity_is_uuid_only() {
        let data = decode_covered(&FormDataCodec, &form_data_payload());
        assert_identity_minimal(&data);
        assert_eq!(data.encode_identity(), json!({"uuid": "fd-1"}));
    }

    #[test]
    fn test_form_optional_fields_absent() {
        let form = FormCodec::default()
            .decode(&CodecContext::default(), r#"{"uuid":"f-9","tags":null}"#)
            .unwrap();
        assert!(form.name.is_none());
        assert!(!form.retired);
        assert!(form.tags.is_empty());
    }
}
