//! Remote clinical-record server boundary
//!
//! clinsync does not perform HTTP itself. A transport implements
//! [`RemoteResource`] and is handed JSON text to upload or delete, or a
//! [`DownloadRequest`] to answer with JSON text. [`RemoteEndpoint`] turns a
//! request into the URL the transport should call, using [`RemoteConfig`] for
//! the base URL, page size, timeout and proxy.

use crate::config::{RemoteConfig, SecretString};
use crate::core::codec::EntityKind;
use crate::domain::{ClinsyncError, Representation, Result, TransportError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Transport collaborator for one remote server
#[async_trait]
pub trait RemoteResource: Send + Sync {
    /// Fetches the JSON text answering `request`
    ///
    /// # Errors
    ///
    /// Returns a transport error when the server cannot be reached or
    /// answers with an error status.
    async fn download(&self, request: &DownloadRequest) -> Result<String>;

    /// Sends an encoded entity to `resource`
    async fn upload(&self, resource: &str, body: String) -> Result<()>;

    /// Deletes the row identified by `identity` from `resource`
    async fn delete(&self, resource: &str, identity: String) -> Result<()>;
}

/// Download request for one resource
///
/// Serialized as query parameters: the representation as `v=custom:(...)`,
/// paging as `startIndex`/`limit`, then any extra parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Resource path relative to the base URL, e.g. `patient`
    pub resource: String,

    /// Representation spec, without the `custom:` prefix
    pub representation: String,

    /// Extra query parameters (optional)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,

    /// Offset for pagination (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,

    /// Page size (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl DownloadRequest {
    /// Create a new download request
    pub fn new(resource: impl Into<String>, representation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            representation: representation.into(),
            parameters: BTreeMap::new(),
            start_index: None,
            limit: None,
        }
    }

    /// Request for an entity kind's own resource and representation
    ///
    /// # Errors
    ///
    /// Returns a validation error for kinds that are only ever embedded in
    /// other entities.
    pub fn for_kind(kind: EntityKind) -> Result<Self> {
        let resource = kind.resource().ok_or_else(|| {
            ClinsyncError::Validation(format!("{kind} has no resource of its own"))
        })?;
        Ok(Self::new(resource, kind.representation()))
    }

    /// Add a query parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Restrict to the given uuid, as a sub-resource path
    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.resource = format!("{}/{uuid}", self.resource.trim_end_matches('/'));
        self
    }

    /// Set pagination offset
    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = Some(start_index);
        self
    }

    /// Set page size
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in the order they are sent
    ///
    /// # Errors
    ///
    /// Returns a validation error when the representation does not parse.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        let representation = Representation::parse(&self.representation).map_err(|e| {
            ClinsyncError::Validation(format!(
                "Invalid representation for {}: {e}",
                self.resource
            ))
        })?;

        let mut pairs = vec![("v".to_string(), representation.as_query_value())];
        if let Some(start_index) = self.start_index {
            pairs.push(("startIndex".to_string(), start_index.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs.extend(
            self.parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Ok(pairs)
    }
}

/// Resolved remote server settings
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    base: Url,
    config: RemoteConfig,
}

impl RemoteEndpoint {
    /// Creates an endpoint from configuration
    ///
    /// # Errors
    ///
    /// Returns a transport error when the base URL does not parse or cannot
    /// carry a path.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidRequest(format!(
                "Base URL '{}' cannot carry a resource path",
                config.base_url
            ))
            .into());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, config })
    }

    /// Base URL, always ending in `/`
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of a resource, without query parameters
    pub fn resource_url(&self, resource: &str) -> Result<Url> {
        self.base
            .join(resource.trim_start_matches('/'))
            .map_err(|e| {
                TransportError::InvalidRequest(format!("Invalid resource '{resource}': {e}"))
                    .into()
            })
    }

    /// Full download URL
    ///
    /// Requests without an explicit limit get the configured page size.
    pub fn download_url(&self, request: &DownloadRequest) -> Result<Url> {
        let mut request = request.clone();
        if request.limit.is_none() {
            request.limit = Some(self.config.page_size);
        }

        let mut url = self.resource_url(&request.resource)?;
        url.query_pairs_mut().extend_pairs(request.query_pairs()?);
        Ok(url)
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    pub fn proxy(&self) -> Option<&str> {
        self.config.proxy.as_deref()
    }

    /// Username and password, when configured
    pub fn credentials(&self) -> Option<(&str, &SecretString)> {
        match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::core::codec::representations;
    use secrecy::ExposeSecret;

    fn endpoint() -> RemoteEndpoint {
        RemoteEndpoint::new(RemoteConfig::new(
            "https://emr.example.org/openmrs/ws/rest/v1",
        ))
        .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(
            endpoint().base_url().as_str(),
            "https://emr.example.org/openmrs/ws/rest/v1/"
        );
    }

    #[test]
    fn test_download_url_carries_representation_and_page_size() {
        let request = DownloadRequest::new("cohort", representations::COHORT)
            .with_parameter("q", "flu");
        let url = endpoint().download_url(&request).unwrap();

        assert_eq!(url.path(), "/openmrs/ws/rest/v1/cohort");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("v".to_string(), "custom:(uuid,name,dynamic)".to_string()),
                ("limit".to_string(), "100".to_string()),
                ("q".to_string(), "flu".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_for_kind() {
        let request = DownloadRequest::for_kind(EntityKind::Observation)
            .unwrap()
            .with_uuid("obs-1")
            .with_start_index(50)
            .with_limit(25);
        assert_eq!(request.resource, "obs/obs-1");
        assert_eq!(request.representation, representations::OBSERVATION);

        let pairs = request.query_pairs().unwrap();
        assert_eq!(pairs[1], ("startIndex".to_string(), "50".to_string()));
        assert_eq!(pairs[2], ("limit".to_string(), "25".to_string()));

        assert!(DownloadRequest::for_kind(EntityKind::PersonName).is_err());
    }

    #[test]
    fn test_invalid_representation_is_rejected() {
        let request = DownloadRequest::new("cohort", "(uuid,");
        assert!(matches!(
            request.query_pairs(),
            Err(ClinsyncError::Validation(_))
        ));
    }

    #[test]
    fn test_endpoint_settings() {
        let mut config = RemoteConfig::new("https://emr.example.org/openmrs/ws/rest/v1/");
        config.username = Some("admin".to_string());
        config.password = Some(secret_string("Admin123".to_string()));
        config.timeout_seconds = 12;
        config.proxy = Some("http://proxy.local:3128".to_string());

        let endpoint = RemoteEndpoint::new(config).unwrap();
        assert_eq!(endpoint.timeout(), Duration::from_secs(12));
        assert_eq!(endpoint.proxy(), Some("http://proxy.local:3128"));
        let (username, password) = endpoint.credentials().unwrap();
        assert_eq!(username, "admin");
        assert_eq!(password.expose_secret(), "Admin123");
    }

    #[test]
    fn test_mailto_base_is_rejected() {
        assert!(RemoteEndpoint::new(RemoteConfig::new("mailto:ops@example.org")).is_err());
    }
}
