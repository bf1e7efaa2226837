//! Collaborator boundaries for clinsync.
//!
//! clinsync owns neither the network nor the device database. Both sit behind
//! traits so the host application can plug in its own implementations and
//! tests can use in-memory ones:
//!
//! - [`remote`] - Remote server transport and download request building
//! - [`store`] - On-device entity storage
//!
//! # Example
//!
//! ```rust,no_run
//! use clinsync::adapters::remote::{DownloadRequest, RemoteEndpoint};
//! use clinsync::config::RemoteConfig;
//! use clinsync::core::codec::EntityKind;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = RemoteEndpoint::new(RemoteConfig::new(
//!     "https://emr.example.org/openmrs/ws/rest/v1",
//! ))?;
//! let request = DownloadRequest::for_kind(EntityKind::Cohort)?.with_parameter("q", "flu");
//! println!("GET {}", endpoint.download_url(&request)?);
//! # Ok(())
//! # }
//! ```

pub mod remote;
pub mod store;

pub use remote::{DownloadRequest, RemoteEndpoint, RemoteResource};
pub use store::{EntityStore, InMemoryStore};
