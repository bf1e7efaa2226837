//! Configuration schema types
//!
//! This module defines the configuration structure for clinsync.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the codecs treat recoverable anomalies
///
/// Permissive mode reports an unparseable date or an unresolvable cohort
/// payload to the diagnostic sink and carries on with an absent value.
/// Strict mode turns both into decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Report and continue
    #[default]
    Permissive,
    /// Fail the decode
    Strict,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Invalid strictness '{s}'. Expected 'permissive' or 'strict'"
            )),
        }
    }
}

/// Main clinsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinsyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Codec behavior
    #[serde(default)]
    pub codec: CodecConfig,

    /// Remote clinical-record server
    pub remote: RemoteConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClinsyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.remote.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Codec configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Handling of malformed dates and unresolvable cohort payloads
    #[serde(default)]
    pub strictness: Strictness,
}

/// Remote server configuration
///
/// Consumed by the download request builder and handed to the transport
/// collaborator; the codecs themselves never read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the REST API, e.g. `https://emr.example.org/openmrs/ws/rest/v1`
    pub base_url: String,

    /// Username for authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for authentication (optional)
    /// Stored securely in memory and zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// HTTP proxy URL (optional)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Page size for list downloads
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl RemoteConfig {
    /// Creates a configuration for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: None,
            password: None,
            timeout_seconds: default_timeout_seconds(),
            proxy: None,
            page_size: default_page_size(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("remote.base_url cannot be empty".to_string());
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid remote.base_url '{}': {e}", self.base_url))?;

        if let Some(proxy) = &self.proxy {
            url::Url::parse(proxy).map_err(|e| format!("Invalid remote.proxy '{proxy}': {e}"))?;
        }

        if self.timeout_seconds == 0 {
            return Err("remote.timeout_seconds must be greater than 0".to_string());
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err("remote.page_size must be between 1 and 1000".to_string());
        }

        if self.username.is_some() != self.password.is_some() {
            return Err("remote.username and remote.password must be set together".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_page_size() -> usize {
    100
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
