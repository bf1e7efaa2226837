//! Field extraction from parsed payloads
//!
//! A [`Document`] is a view of one JSON object inside a payload. It knows the
//! absolute path it sits at and the entity type being decoded, so every error
//! it raises names both. Scalars are read through the [`FieldValue`] trait:
//!
//! - `required::<T>` fails with `MissingField` when the path is absent or null
//! - `optional::<T>` yields `None` instead
//! - a present value of the wrong JSON type is a `WrongType` error either way
//! - an unparseable date is reported to the diagnostic sink and read as
//!   absent, unless the context is strict

use super::encode::parse_timestamp;
use super::CodecContext;
use crate::config::Strictness;
use crate::domain::path::JsonPath;
use crate::domain::{CodecError, CodecResult, Timestamp};
use crate::logging::diagnostics::Diagnostic;
use rust_decimal::Decimal;
use serde_json::Value;
use std::cell::RefCell;
use std::str::FromStr;

/// Why a JSON value could not be read as a given kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    /// The JSON type does not match the kind
    WrongType,
    /// The JSON type matches but the content does not parse
    Malformed(String),
}

/// A scalar kind the extractor can read
pub trait FieldValue: Sized {
    /// Human-readable kind, used in error messages ("a string")
    const EXPECTED: &'static str;

    /// Converts a non-null JSON value
    fn from_json(value: &Value) -> Result<Self, ScalarError>;
}

impl FieldValue for String {
    const EXPECTED: &'static str = "a string";

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or(ScalarError::WrongType)
    }
}

impl FieldValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value.as_i64().ok_or(ScalarError::WrongType)
    }
}

impl FieldValue for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value.as_bool().ok_or(ScalarError::WrongType)
    }
}

/// Numbers keep the digits serde_json parsed; numeric strings are accepted too
impl FieldValue for Decimal {
    const EXPECTED: &'static str = "a number";

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        let text = match value {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text.trim().to_string(),
            _ => return Err(ScalarError::WrongType),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| ScalarError::Malformed(format!("'{text}' is not a decimal: {e}")))
    }
}

impl FieldValue for Timestamp {
    const EXPECTED: &'static str = "a date-time string";

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        let raw = value.as_str().ok_or(ScalarError::WrongType)?;
        parse_timestamp(raw)
            .map_err(|e| ScalarError::Malformed(format!("'{raw}' is not a date-time: {e}")))
    }
}

/// Records every path read while decoding
///
/// Used to check a codec against its representation spec: every recorded
/// path must be covered by the spec the codec requests.
#[derive(Debug, Default)]
pub struct PathTrace {
    paths: RefCell<Vec<JsonPath>>,
}

impl PathTrace {
    /// Creates an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every path read so far, in read order
    pub fn paths(&self) -> Vec<JsonPath> {
        self.paths.borrow().clone()
    }

    fn record(&self, path: JsonPath) {
        self.paths.borrow_mut().push(path);
    }
}

/// A JSON object inside a payload, positioned at an absolute path
#[derive(Debug, Clone)]
pub struct Document<'a> {
    value: &'a Value,
    at: JsonPath,
    entity: &'static str,
    context: &'a CodecContext,
    trace: Option<&'a PathTrace>,
}

impl<'a> Document<'a> {
    /// Wraps a payload root
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` when `value` is not a JSON object
    pub fn new(
        value: &'a Value,
        entity: &'static str,
        context: &'a CodecContext,
    ) -> CodecResult<Self> {
        if !value.is_object() {
            return Err(CodecError::MalformedDocument {
                entity,
                reason: format!("expected a JSON object, found {}", kind_of(value)),
            });
        }
        Ok(Self {
            value,
            at: JsonPath::root(),
            entity,
            context,
            trace: None,
        })
    }

    /// Records every path read from this document and its children
    pub fn traced(mut self, trace: &'a PathTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// The same document, attributed to another entity type
    pub fn for_entity(&self, entity: &'static str) -> Self {
        Self {
            entity,
            ..self.clone()
        }
    }

    /// Entity type errors are attributed to
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Absolute path of this document inside the payload
    pub fn location(&self) -> &JsonPath {
        &self.at
    }

    /// The underlying JSON object
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Decode context (strictness and diagnostic sink)
    pub fn context(&self) -> &'a CodecContext {
        self.context
    }

    /// True when `path` resolves to a non-null value
    pub fn has(&self, path: impl Into<JsonPath>) -> bool {
        self.lookup(&path.into()).is_some()
    }

    /// Reads a field that must be present
    ///
    /// # Errors
    ///
    /// `MissingField` when absent or null, `WrongType` for the wrong JSON
    /// type, `MalformedScalar` when the value does not parse.
    pub fn required<T: FieldValue>(&self, path: impl Into<JsonPath>) -> CodecResult<T> {
        let path = path.into();
        let value = self
            .lookup(&path)
            .ok_or_else(|| self.missing(&path))?;
        T::from_json(value).map_err(|e| match e {
            ScalarError::WrongType => self.wrong_type(&path, T::EXPECTED),
            ScalarError::Malformed(reason) => CodecError::MalformedScalar {
                entity: self.entity,
                path: self.at.join(&path).to_string(),
                reason,
            },
        })
    }

    /// Reads a field that may be absent
    ///
    /// # Errors
    ///
    /// `WrongType` for a present value of the wrong JSON type. An unparseable
    /// value is reported and read as `None`, or fails with `MalformedScalar`
    /// under strict mode.
    pub fn optional<T: FieldValue>(&self, path: impl Into<JsonPath>) -> CodecResult<Option<T>> {
        let path = path.into();
        let Some(value) = self.lookup(&path) else {
            return Ok(None);
        };
        match T::from_json(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(ScalarError::WrongType) => Err(self.wrong_type(&path, T::EXPECTED)),
            Err(ScalarError::Malformed(reason)) => {
                let absolute = self.at.join(&path).to_string();
                if self.context.strictness() == Strictness::Strict {
                    return Err(CodecError::MalformedScalar {
                        entity: self.entity,
                        path: absolute,
                        reason,
                    });
                }
                self.context
                    .report(Diagnostic::malformed_scalar(self.entity, absolute, reason));
                Ok(None)
            }
        }
    }

    /// Reads an optional boolean; absent reads as `false`
    pub fn flag(&self, path: impl Into<JsonPath>) -> CodecResult<bool> {
        Ok(self.optional::<bool>(path)?.unwrap_or(false))
    }

    /// Returns the nested object at `path`
    ///
    /// # Errors
    ///
    /// `MissingField` when absent, `WrongType` when not an object
    pub fn object(&self, path: impl Into<JsonPath>) -> CodecResult<Document<'a>> {
        let path = path.into();
        let value = self
            .lookup(&path)
            .ok_or_else(|| self.missing(&path))?;
        self.child(path, value)
    }

    /// Returns the nested object at `path`, if present
    pub fn optional_object(&self, path: impl Into<JsonPath>) -> CodecResult<Option<Document<'a>>> {
        let path = path.into();
        match self.lookup(&path) {
            Some(value) => self.child(path, value).map(Some),
            None => Ok(None),
        }
    }

    /// Returns each element of the array at `path` as a document
    ///
    /// An absent array reads as empty. Every element must be an object.
    pub fn array(&self, path: impl Into<JsonPath>) -> CodecResult<Vec<Document<'a>>> {
        let path = path.into();
        let Some(value) = self.lookup(&path) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.wrong_type(&path, "an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.child(path.clone().index(index), item))
            .collect()
    }

    fn child(&self, path: JsonPath, value: &'a Value) -> CodecResult<Document<'a>> {
        if !value.is_object() {
            return Err(self.wrong_type(&path, "an object"));
        }
        Ok(Document {
            value,
            at: self.at.join(&path),
            entity: self.entity,
            context: self.context,
            trace: self.trace,
        })
    }

    fn lookup(&self, path: &JsonPath) -> Option<&'a Value> {
        if let Some(trace) = self.trace {
            trace.record(self.at.join(path));
        }
        path.resolve(self.value).filter(|value| !value.is_null())
    }

    fn missing(&self, path: &JsonPath) -> CodecError {
        CodecError::MissingField {
            entity: self.entity,
            path: self.at.join(path).to_string(),
        }
    }

    fn wrong_type(&self, path: &JsonPath, expected: &'static str) -> CodecError {
        CodecError::WrongType {
            entity: self.entity,
            path: self.at.join(path).to_string(),
            expected,
        }
    }
}

/// Parses raw payload text
///
/// # Errors
///
/// Returns `MalformedDocument` when the text is not valid JSON
pub fn parse_payload(raw: &str, entity: &'static str) -> CodecResult<Value> {
    serde_json::from_str(raw).map_err(|e| CodecError::MalformedDocument {
        entity,
        reason: e.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
