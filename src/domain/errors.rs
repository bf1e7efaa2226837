//! Domain error types
//!
//! This module defines the error hierarchy for clinsync. Codec failures carry the
//! entity type and the JSON path that failed so a decode error can be traced back
//! to a specific payload.

use thiserror::Error;

/// Main clinsync error type
///
/// This is the error type returned at the crate boundary. It wraps codec,
/// transport and store failures along with configuration and I/O errors.
#[derive(Debug, Error)]
pub enum ClinsyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entity codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Remote transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Local store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while decoding or encoding an entity
///
/// `entity` is the wire name of the entity type being processed and `path`
/// is the absolute JSON path (bracket notation) of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The raw input is not JSON, or not a JSON object
    #[error("Malformed {entity} document: {reason}")]
    MalformedDocument {
        entity: &'static str,
        reason: String,
    },

    /// A required field is absent or null
    #[error("Missing required field {path} in {entity} payload")]
    MissingField { entity: &'static str, path: String },

    /// A field is present but holds the wrong JSON type
    #[error("Field {path} in {entity} payload is not {expected}")]
    WrongType {
        entity: &'static str,
        path: String,
        expected: &'static str,
    },

    /// A scalar could not be parsed (strict mode only)
    #[error("Malformed value at {path} in {entity} payload: {reason}")]
    MalformedScalar {
        entity: &'static str,
        path: String,
        reason: String,
    },

    /// The payload matched none of the known shapes (strict mode only)
    #[error("{entity} payload matches no known shape")]
    UnresolvedShape { entity: &'static str },

    /// The encoded value could not be rendered as JSON text
    #[error("Failed to encode {entity}: {reason}")]
    Encode {
        entity: &'static str,
        reason: String,
    },
}

impl CodecError {
    /// Returns the entity type the error was raised for
    pub fn entity(&self) -> &'static str {
        match self {
            Self::MalformedDocument { entity, .. }
            | Self::MissingField { entity, .. }
            | Self::WrongType { entity, .. }
            | Self::MalformedScalar { entity, .. }
            | Self::UnresolvedShape { entity }
            | Self::Encode { entity, .. } => entity,
        }
    }

    /// Returns the failing JSON path, if the error is tied to a field
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path, .. }
            | Self::WrongType { path, .. }
            | Self::MalformedScalar { path, .. } => Some(path),
            _ => None,
        }
    }

    /// True when the error only signals that a required path was absent
    ///
    /// The cohort discriminator uses this to route to the next payload shape.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

/// Errors reported by the remote transport collaborator
///
/// These errors don't expose the HTTP client's own types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to connect to the server
    #[error("Failed to connect to server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The request could not be built from configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<std::io::Error> for ClinsyncError {
    fn from(err: std::io::Error) -> Self {
        ClinsyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClinsyncError {
    fn from(err: serde_json::Error) -> Self {
        ClinsyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ClinsyncError {
    fn from(err: toml::de::Error) -> Self {
        ClinsyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
