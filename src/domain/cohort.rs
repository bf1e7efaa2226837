//! Cohorts and cohort evaluation results

use super::patient::Patient;
use super::Timestamp;
use serde::{Deserialize, Serialize};

/// A named group of patients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub uuid: String,
    pub name: Option<String>,
    /// Membership is computed from a definition rather than stored
    pub dynamic: bool,
}

/// Server-side definition a dynamic cohort is evaluated from
///
/// Only ever held locally as a deletion placeholder; its encoding carries the
/// uuid alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortDefinition {
    pub uuid: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Membership of one patient in one cohort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortMember {
    pub cohort_uuid: String,
    pub patient_uuid: String,
    pub date_added: Option<Timestamp>,
    pub patient: Option<Patient>,
}

impl CohortMember {
    /// Builds the membership row for a patient found in a cohort evaluation
    pub fn synthesize(cohort_uuid: impl Into<String>, patient: Patient) -> Self {
        Self {
            cohort_uuid: cohort_uuid.into(),
            patient_uuid: patient.uuid.clone(),
            date_added: None,
            patient: Some(patient),
        }
    }
}

/// Which of the two cohort evaluation payload shapes a document had
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    /// `results[*].cohort` plus `results[*].patient`
    Static,
    /// `definition` plus a flat `members` list
    Dynamic,
}

/// Decoded cohort evaluation result
///
/// `shape` is `None` when the payload matched neither known shape; the
/// cohort is then absent and there are no members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortData {
    pub cohort: Option<Cohort>,
    pub members: Vec<CohortMember>,
    pub shape: Option<PayloadShape>,
}

impl CohortData {
    /// True only for a payload resolved as the dynamic shape
    pub fn is_dynamic(&self) -> bool {
        self.shape == Some(PayloadShape::Dynamic)
    }

    /// Patients carried by the membership rows
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.members.iter().filter_map(|member| member.patient.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_member_copies_patient_uuid() {
        let patient = Patient {
            uuid: "p1".to_string(),
            ..Patient::default()
        };
        let member = CohortMember::synthesize("c1", patient);
        assert_eq!(member.cohort_uuid, "c1");
        assert_eq!(member.patient_uuid, "p1");
        assert!(member.date_added.is_none());
    }

    #[test]
    fn test_unresolved_data_is_not_dynamic() {
        let data = CohortData::default();
        assert!(!data.is_dynamic());
        assert_eq!(data.patients().count(), 0);
    }
}
