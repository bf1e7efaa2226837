//! Core logic for clinsync.
//!
//! # Modules
//!
//! - [`codec`] - Entity codecs, field extraction and the cohort payload
//!   discriminator
//! - [`sync`] - Download, upload and delete orchestration over the remote and
//!   store collaborators
//!
//! # Sync Workflow
//!
//! 1. **Request**: Build a [`DownloadRequest`](crate::adapters::DownloadRequest)
//!    carrying the codec's representation spec
//! 2. **Fetch**: The remote collaborator returns JSON text
//! 3. **Decode**: The codec turns the text into domain entities
//! 4. **Save**: Entities are written to the local store
//! 5. **Upload/Delete**: Local entities are encoded (or reduced to their
//!    identity) and handed back to the remote
//!
//! # Example
//!
//! ```rust,no_run
//! use clinsync::adapters::{DownloadRequest, InMemoryStore, RemoteResource};
//! use clinsync::core::codec::CohortCodec;
//! use clinsync::core::sync::SyncPipeline;
//! use std::sync::Arc;
//!
//! # async fn example(remote: Arc<dyn RemoteResource>) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SyncPipeline::new(remote);
//! let store = InMemoryStore::new();
//! let request = DownloadRequest::new("cohort", "(uuid,name,dynamic)");
//!
//! let summary = pipeline.download(&CohortCodec, &request, &store).await?;
//! println!("Saved {} cohorts", summary.saved);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod sync;
