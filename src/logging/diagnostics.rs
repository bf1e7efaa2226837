//! Diagnostic reporting for recoverable codec anomalies
//!
//! Codecs never log through a global. Anything worth reporting (an unparseable
//! date, a cohort payload of unknown shape) is handed to the
//! [`DiagnosticSink`] held by the decode context. [`TracingSink`] forwards to
//! `tracing`; [`RecordingSink`] keeps diagnostics in memory so callers and
//! tests can inspect them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Kind of anomaly reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A scalar (typically a date) could not be parsed and was dropped
    MalformedScalar,
    /// A discriminated payload matched none of its shapes
    UnresolvedShape,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedScalar => write!(f, "malformed_scalar"),
            Self::UnresolvedShape => write!(f, "unresolved_shape"),
        }
    }
}

/// One reported anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Entity type being decoded
    pub entity: &'static str,
    /// Absolute JSON path, when tied to a field
    pub path: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// A scalar at `path` that could not be parsed
    pub fn malformed_scalar(
        entity: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::MalformedScalar,
            entity,
            path: Some(path.into()),
            message: message.into(),
        }
    }

    /// A payload of unknown shape
    pub fn unresolved_shape(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedShape,
            entity,
            path: None,
            message: message.into(),
        }
    }
}

/// Receiver for codec diagnostics
///
/// Implementations must tolerate concurrent calls; no ordering is required.
pub trait DiagnosticSink: Send + Sync {
    /// Reports one diagnostic
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            entity = diagnostic.entity,
            path = diagnostic.path.as_deref().unwrap_or(""),
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of diagnostics reported so far
    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing was reported
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
