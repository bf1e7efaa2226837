//! Forms, form templates and captured form data

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A data-entry form published by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub uuid: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Kind of payload the form produces, e.g. "json-encounter"
    pub discriminator: Option<String>,
    pub version: Option<String>,
    pub retired: bool,
    pub tags: Vec<Tag>,
}

impl Form {
    /// True when the form carries a tag with the given name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

/// Label used to group forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub uuid: String,
    pub name: Option<String>,
}

/// Renderable body of a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub uuid: String,
    pub html: Option<String>,
    pub model: Option<String>,
    pub model_json: Option<String>,
}

/// Data captured on the device with a form, queued for upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub uuid: String,
    pub payload: Option<String>,
    pub xml_payload: Option<String>,
    /// Workflow status, e.g. "incomplete", "complete", "uploaded"
    pub status: Option<String>,
    pub template_uuid: Option<String>,
    pub patient_uuid: Option<String>,
    pub user_uuid: Option<String>,
    pub discriminator: Option<String>,
    pub date_created: Option<Timestamp>,
    pub encounter_date: Option<Timestamp>,
}
