//! Sync pipeline against an in-memory remote and store

use async_trait::async_trait;
use clinsync::adapters::{DownloadRequest, EntityStore, InMemoryStore, RemoteResource};
use clinsync::core::codec::{
    CodecContext, CohortCodec, EntityKind, FormDataCodec, PatientCodec,
};
use clinsync::core::sync::SyncPipeline;
use clinsync::domain::{
    ClinsyncError, Cohort, CohortMember, FormData, Patient, Result, TransportError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, PoisonError};

/// Remote that serves canned pages and records what it was sent
#[derive(Default)]
struct FakeRemote {
    pages: Mutex<Vec<String>>,
    requests: Mutex<Vec<DownloadRequest>>,
    uploads: Mutex<Vec<(String, Value)>>,
    deletes: Mutex<Vec<(String, Value)>>,
}

impl FakeRemote {
    fn serving(pages: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into_iter().rev().map(|p| p.to_string()).collect()),
            ..Self::default()
        })
    }

    fn requests(&self) -> Vec<DownloadRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RemoteResource for FakeRemote {
    async fn download(&self, request: &DownloadRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or_else(|| TransportError::NotFound(request.resource.clone()).into())
    }

    async fn upload(&self, resource: &str, body: String) -> Result<()> {
        let body = serde_json::from_str(&body)?;
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((resource.to_string(), body));
        Ok(())
    }

    async fn delete(&self, resource: &str, identity: String) -> Result<()> {
        let identity = serde_json::from_str(&identity)?;
        self.deletes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((resource.to_string(), identity));
        Ok(())
    }
}

fn cohort_page(uuids: &[&str]) -> Value {
    let results: Vec<Value> = uuids
        .iter()
        .map(|uuid| json!({"uuid": uuid, "name": format!("Cohort {uuid}"), "dynamic": false}))
        .collect();
    json!({ "results": results })
}

#[tokio::test]
async fn test_download_pages_until_short_page() {
    let remote = FakeRemote::serving(vec![
        cohort_page(&["c1", "c2"]),
        cohort_page(&["c3", "c4"]),
        cohort_page(&["c5"]),
    ]);
    let pipeline = SyncPipeline::new(remote.clone()).with_page_size(2);
    let store: InMemoryStore<Cohort> = InMemoryStore::new();
    let request = DownloadRequest::for_kind(EntityKind::Cohort).unwrap();

    let summary = pipeline.download(&CohortCodec, &request, &store).await.unwrap();

    assert_eq!(summary.entity, "cohort");
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.received, 5);
    assert_eq!(summary.saved, 5);
    assert!(summary.is_complete());
    assert_eq!(store.count().await.unwrap(), 5);

    let offsets: Vec<_> = remote.requests().iter().map(|r| r.start_index).collect();
    assert_eq!(offsets, vec![Some(0), Some(2), Some(4)]);
    assert!(remote.requests().iter().all(|r| r.limit == Some(2)));
}

#[tokio::test]
async fn test_download_decode_error_stops_the_sync() {
    let remote = FakeRemote::serving(vec![json!({"results": [{"name": "no uuid"}]})]);
    let pipeline = SyncPipeline::new(remote);
    let store: InMemoryStore<Cohort> = InMemoryStore::new();
    let request = DownloadRequest::for_kind(EntityKind::Cohort).unwrap();

    let err = pipeline
        .download(&CohortCodec, &request, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, ClinsyncError::Codec(_)));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_transport_error_is_propagated() {
    let remote = FakeRemote::serving(vec![]);
    let pipeline = SyncPipeline::new(remote);
    let request = DownloadRequest::new("patient/P1", "(uuid)");

    let err = pipeline
        .fetch(&PatientCodec::standard(), &request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClinsyncError::Transport(TransportError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_download_cohort_data_saves_cohort_and_patients() {
    let remote = FakeRemote::serving(vec![json!({
        "results": [
            {"cohort": {"uuid": "c-flu", "name": "Flu Patients", "dynamic": false}, "patient": {"uuid": "P1"}},
            {"cohort": {"uuid": "c-flu", "name": "Flu Patients", "dynamic": false}, "patient": {"uuid": "P2"}}
        ]
    })]);
    let pipeline = SyncPipeline::new(remote);
    let cohorts: InMemoryStore<Cohort> = InMemoryStore::new();
    let patients: InMemoryStore<Patient> = InMemoryStore::new();
    let request = DownloadRequest::for_kind(EntityKind::CohortData).unwrap();

    let data = pipeline
        .download_cohort_data(&request, &cohorts, &patients)
        .await
        .unwrap();

    assert_eq!(data.members.len(), 2);
    assert_eq!(cohorts.count().await.unwrap(), 1);
    assert!(patients.get("P2").await.unwrap().is_some());
}

#[tokio::test]
async fn test_strict_pipeline_rejects_unknown_cohort_payload() {
    let remote = FakeRemote::serving(vec![json!({"foo": 1})]);
    let pipeline = SyncPipeline::new(remote).with_context(CodecContext::strict());
    let cohorts: InMemoryStore<Cohort> = InMemoryStore::new();
    let patients: InMemoryStore<Patient> = InMemoryStore::new();
    let request = DownloadRequest::for_kind(EntityKind::CohortData).unwrap();

    let result = pipeline
        .download_cohort_data(&request, &cohorts, &patients)
        .await;
    assert!(result.is_err());
    assert_eq!(cohorts.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upload_and_remove_send_full_and_identity_encodings() {
    let remote = FakeRemote::serving(vec![]);
    let pipeline = SyncPipeline::new(remote.clone());
    let data = FormData {
        uuid: "fd-1".to_string(),
        payload: Some("{}".to_string()),
        status: Some("complete".to_string()),
        patient_uuid: Some("P1".to_string()),
        ..FormData::default()
    };

    pipeline.upload(&FormDataCodec, "formdata", &data).await.unwrap();
    pipeline.remove("formdata", &data).await.unwrap();

    let member = CohortMember {
        cohort_uuid: "c-flu".to_string(),
        patient_uuid: "P1".to_string(),
        ..CohortMember::default()
    };
    pipeline.remove("cohortmembership", &member).await.unwrap();

    let uploads = remote.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1["status"], json!("complete"));
    assert_eq!(uploads[0].1["patientUuid"], json!("P1"));

    let deletes = remote.deletes.lock().unwrap().clone();
    assert_eq!(
        deletes,
        vec![
            ("formdata".to_string(), json!({"uuid": "fd-1"})),
            (
                "cohortmembership".to_string(),
                json!({"cohort": {"uuid": "c-flu"}, "patient": {"uuid": "P1"}})
            ),
        ]
    );
}
