//! Logging and observability
//!
//! This module provides:
//! - Structured logging through `tracing`, with optional JSON file output
//! - A diagnostic channel the codecs report recoverable anomalies through
//!
//! # Example
//!
//! ```no_run
//! use clinsync::logging::init_logging;
//! use clinsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod diagnostics;
pub mod structured;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, RecordingSink, TracingSink};
pub use structured::{init_logging, LoggingGuard};

/// Log a codec failure with the entity and path it was attributed to
///
/// # Example
///
/// ```no_run
/// use clinsync::log_codec_error;
/// use clinsync::domain::CodecError;
///
/// let error = CodecError::MissingField {
///     entity: "location",
///     path: "$['location']['uuid']".to_string(),
/// };
/// log_codec_error!(&error, "Failed to decode encounter");
/// ```
#[macro_export]
macro_rules! log_codec_error {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            entity = $error.entity(),
            path = $error.path().unwrap_or(""),
            context = $context,
            "Codec error"
        );
    };
}
