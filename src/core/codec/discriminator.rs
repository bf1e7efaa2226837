//! Payload shape discrimination
//!
//! Some resources answer with one of several incompatible payload shapes and
//! nothing out of band says which. Each candidate shape is an [`Attempt`]:
//! the marker paths that must be present (and non-null) for the shape to
//! apply, and the decoder to run when they are. Attempts are tried in order;
//! the first whose markers all resolve wins.
//!
//! Absence of a marker only routes to the next attempt. Once an attempt has
//! matched, any decode error it raises is returned as-is.

use super::Document;
use crate::domain::{CodecResult, JsonPath, PayloadShape};

type DecodeFn<'f, T> = Box<dyn Fn(&Document<'_>) -> CodecResult<T> + 'f>;

/// Outcome of discriminating a payload
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// An attempt's markers were present and its decode succeeded
    Matched { shape: PayloadShape, value: T },
    /// No attempt's markers were present
    Unresolved,
}

impl<T> Resolution<T> {
    /// The matched shape, if any
    pub fn shape(&self) -> Option<PayloadShape> {
        match self {
            Self::Matched { shape, .. } => Some(*shape),
            Self::Unresolved => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// The decoded value, if any
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Matched { value, .. } => Some(value),
            Self::Unresolved => None,
        }
    }
}

/// One candidate payload shape
pub struct Attempt<'f, T> {
    shape: PayloadShape,
    markers: Vec<JsonPath>,
    decode: DecodeFn<'f, T>,
}

impl<'f, T> Attempt<'f, T> {
    pub fn new(
        shape: PayloadShape,
        decode: impl Fn(&Document<'_>) -> CodecResult<T> + 'f,
    ) -> Self {
        Self {
            shape,
            markers: Vec::new(),
            decode: Box::new(decode),
        }
    }

    /// Adds a path that must be present for this shape to apply
    pub fn requires(mut self, marker: impl Into<JsonPath>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn shape(&self) -> PayloadShape {
        self.shape
    }

    fn matches(&self, doc: &Document<'_>) -> bool {
        !self.markers.is_empty() && self.markers.iter().all(|marker| doc.has(marker))
    }
}

/// Tries each attempt in order and decodes with the first that matches
///
/// # Errors
///
/// Returns the matched attempt's decode error. Never errors when nothing
/// matches; that is [`Resolution::Unresolved`].
pub fn resolve<T>(doc: &Document<'_>, attempts: &[Attempt<'_, T>]) -> CodecResult<Resolution<T>> {
    for attempt in attempts {
        if !attempt.matches(doc) {
            tracing::trace!(
                entity = doc.entity(),
                shape = ?attempt.shape,
                "payload shape markers absent"
            );
            continue;
        }
        let value = (attempt.decode)(doc)?;
        tracing::debug!(entity = doc.entity(), shape = ?attempt.shape, "payload shape resolved");
        return Ok(Resolution::Matched {
            shape: attempt.shape,
            value,
        });
    }
    Ok(Resolution::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::CodecContext;
    use crate::domain::CodecError;
    use serde_json::json;

    fn attempts<'f>() -> [Attempt<'f, String>; 2] {
        [
            Attempt::new(PayloadShape::Static, |doc| doc.required::<String>("a"))
                .requires("a"),
            Attempt::new(PayloadShape::Dynamic, |doc| doc.required::<String>("b"))
                .requires("b")
                .requires("c"),
        ]
    }

    #[test]
    fn test_first_matching_attempt_wins() {
        let context = CodecContext::default();
        let value = json!({"a": "first", "b": "second", "c": 1});
        let doc = Document::new(&value, "sample", &context).unwrap();

        let resolution = resolve(&doc, &attempts()).unwrap();
        assert_eq!(
            resolution,
            Resolution::Matched {
                shape: PayloadShape::Static,
                value: "first".to_string(),
            }
        );
    }

    #[test]
    fn test_falls_through_when_markers_absent() {
        let context = CodecContext::default();
        let value = json!({"a": null, "b": "second", "c": 1});
        let doc = Document::new(&value, "sample", &context).unwrap();

        let resolution = resolve(&doc, &attempts()).unwrap();
        assert_eq!(resolution.shape(), Some(PayloadShape::Dynamic));
        assert_eq!(resolution.into_value().as_deref(), Some("second"));
    }

    #[test]
    fn test_every_marker_is_required() {
        let context = CodecContext::default();
        let value = json!({"b": "second"});
        let doc = Document::new(&value, "sample", &context).unwrap();

        let resolution = resolve(&doc, &attempts()).unwrap();
        assert!(!resolution.is_matched());
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_decode_error_after_match_is_returned() {
        let context = CodecContext::default();
        let value = json!({"a": 42});
        let doc = Document::new(&value, "sample", &context).unwrap();

        let err = resolve(&doc, &attempts()).unwrap_err();
        assert!(matches!(err, CodecError::WrongType { .. }));
    }
}
