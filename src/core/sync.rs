//! Download, upload and delete orchestration
//!
//! [`SyncPipeline`] ties the codecs to the two collaborators: JSON text comes
//! from a [`RemoteResource`], is decoded with an [`EntityCodec`] and saved to
//! an [`EntityStore`]; local entities are encoded and handed back to the
//! remote for upload or deletion.

use crate::adapters::remote::{DownloadRequest, RemoteResource};
use crate::adapters::store::EntityStore;
use crate::config::ClinsyncConfig;
use crate::core::codec::{CodecContext, CohortDataCodec, DeleteIdentity, EntityCodec};
use crate::domain::{Cohort, CohortData, Identified, Patient, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default page size for paged downloads
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Summary of one download
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    /// Entity type downloaded
    pub entity: &'static str,

    /// Number of pages fetched
    pub pages: usize,

    /// Number of entities decoded
    pub received: usize,

    /// Number of entities written to the store
    pub saved: usize,

    /// Duration of the download
    pub duration: Duration,
}

impl SyncSummary {
    /// Create a new empty summary
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            pages: 0,
            received: 0,
            saved: 0,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True when every decoded entity was saved
    pub fn is_complete(&self) -> bool {
        self.saved == self.received
    }
}

/// Moves entities between the remote server and the local store
pub struct SyncPipeline {
    remote: Arc<dyn RemoteResource>,
    context: CodecContext,
    page_size: usize,
}

impl SyncPipeline {
    /// Create a pipeline with a permissive codec context
    pub fn new(remote: Arc<dyn RemoteResource>) -> Self {
        Self {
            remote,
            context: CodecContext::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Create a pipeline configured from the `[codec]` and `[remote]` sections
    pub fn from_config(remote: Arc<dyn RemoteResource>, config: &ClinsyncConfig) -> Self {
        Self::new(remote)
            .with_context(CodecContext::from_config(&config.codec))
            .with_page_size(config.remote.page_size)
    }

    /// Set the codec context
    pub fn with_context(mut self, context: CodecContext) -> Self {
        self.context = context;
        self
    }

    /// Set the page size; zero is treated as one
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn context(&self) -> &CodecContext {
        &self.context
    }

    /// Downloads every page of a list resource and saves the entities
    ///
    /// Pages are requested until one comes back shorter than the page size.
    /// An explicit start index on `request` is used as the first offset.
    ///
    /// # Errors
    ///
    /// Returns the first transport, decode or store error. Pages saved before
    /// the error stay saved.
    pub async fn download<C, S>(
        &self,
        codec: &C,
        request: &DownloadRequest,
        store: &S,
    ) -> Result<SyncSummary>
    where
        C: EntityCodec + Sync,
        C::Entity: Identified + Clone + Send + Sync + 'static,
        S: EntityStore<C::Entity> + ?Sized,
    {
        let start = Instant::now();
        let mut summary = SyncSummary::new(C::ENTITY);
        let mut offset = request.start_index.unwrap_or(0);

        tracing::info!(
            entity = C::ENTITY,
            resource = %request.resource,
            page_size = self.page_size,
            "Starting download"
        );

        loop {
            let page = request
                .clone()
                .with_start_index(offset)
                .with_limit(self.page_size);
            let raw = self.remote.download(&page).await?;
            let entities = codec.decode_list(&self.context, &raw)?;
            let received = entities.len();

            summary.pages += 1;
            summary.received += received;
            summary.saved += store.save(entities).await?;

            tracing::debug!(
                entity = C::ENTITY,
                page = summary.pages,
                offset,
                received,
                "Downloaded page"
            );

            if received < self.page_size {
                break;
            }
            offset += received;
        }

        let summary = summary.with_duration(start.elapsed());
        tracing::info!(
            entity = C::ENTITY,
            pages = summary.pages,
            received = summary.received,
            saved = summary.saved,
            duration_ms = summary.duration.as_millis(),
            "Download completed"
        );
        Ok(summary)
    }

    /// Downloads one entity document
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error.
    pub async fn fetch<C>(&self, codec: &C, request: &DownloadRequest) -> Result<C::Entity>
    where
        C: EntityCodec + Sync,
    {
        let raw = self.remote.download(request).await?;
        let entity = codec.decode(&self.context, &raw)?;
        tracing::debug!(entity = C::ENTITY, resource = %request.resource, "Fetched entity");
        Ok(entity)
    }

    /// Downloads a cohort evaluation and saves its cohort and patients
    ///
    /// A payload of unknown shape saves nothing under the permissive context
    /// and is an error under the strict one.
    ///
    /// # Errors
    ///
    /// Returns a transport, decode or store error.
    pub async fn download_cohort_data<CS, PS>(
        &self,
        request: &DownloadRequest,
        cohorts: &CS,
        patients: &PS,
    ) -> Result<CohortData>
    where
        CS: EntityStore<Cohort> + ?Sized,
        PS: EntityStore<Patient> + ?Sized,
    {
        let raw = self.remote.download(request).await?;
        let data = CohortDataCodec::default().decode(&self.context, &raw)?;

        if let Some(cohort) = &data.cohort {
            cohorts.save(vec![cohort.clone()]).await?;
        }
        let saved = patients.save(data.patients().cloned().collect()).await?;

        tracing::info!(
            cohort = data.cohort.as_ref().map(|c| c.uuid.as_str()).unwrap_or("-"),
            shape = ?data.shape,
            members = data.members.len(),
            patients_saved = saved,
            "Cohort evaluation downloaded"
        );
        Ok(data)
    }

    /// Encodes an entity and uploads it to `resource`
    ///
    /// # Errors
    ///
    /// Returns an encode or transport error.
    pub async fn upload<C>(&self, codec: &C, resource: &str, entity: &C::Entity) -> Result<()>
    where
        C: EntityCodec + Sync,
        C::Entity: Sync,
    {
        let body = codec.encode(entity)?;
        self.remote.upload(resource, body).await?;
        tracing::debug!(entity = C::ENTITY, resource, "Uploaded entity");
        Ok(())
    }

    /// Asks the remote to delete the row identified by `entity`
    ///
    /// Only the identity encoding is sent.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn remove<T>(&self, resource: &str, entity: &T) -> Result<()>
    where
        T: DeleteIdentity + Sync,
    {
        let identity = entity.identity_json();
        self.remote.delete(resource, identity).await?;
        tracing::debug!(resource, fields = ?T::IDENTITY_FIELDS, "Deleted remote row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults() {
        let summary = SyncSummary::new("cohort").with_duration(Duration::from_millis(12));
        assert_eq!(summary.pages, 0);
        assert!(summary.is_complete());
        assert_eq!(summary.duration, Duration::from_millis(12));
    }
}
