//! Encoding helpers and the date-time wire format
//!
//! The server sends and accepts date-times as `yyyy-MM-ddTHH:mm:ss.SSS±hhmm`
//! (for example `2013-06-21T00:00:00.000+0700`). RFC 3339 text is accepted on
//! decode as well; encode always writes the wire format.

use crate::domain::{NumericValue, Timestamp};
use chrono::DateTime;
use serde_json::{Map, Value};

/// Date-time wire format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parses a wire date-time, falling back to RFC 3339
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).or_else(|e| {
        DateTime::parse_from_rfc3339(raw).map_err(|_| e)
    })
}

/// Formats a date-time in the wire format
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Writes a decimal as a JSON number with the same digits
///
/// Numbers hold their source text (`arbitrary_precision`), so trailing zeros
/// and digits past `f64` range survive. Falls back to a JSON string for text
/// serde_json does not accept as a number.
pub fn decimal_value(value: &NumericValue) -> Value {
    let text = value.to_string();
    serde_json::from_str::<Value>(&text)
        .ok()
        .filter(Value::is_number)
        .unwrap_or(Value::String(text))
}

/// Builder for an encoded JSON object
///
/// Absent optional values are skipped rather than written as `null`, so a
/// decode of the output yields the same absent values.
#[derive(Debug, Default)]
pub struct JsonObject {
    map: Map<String, Value>,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a value unconditionally
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    /// Writes a value when present
    pub fn optional<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Writes a borrowed string when present
    pub fn text(self, key: &str, value: Option<&String>) -> Self {
        self.optional(key, value.cloned())
    }

    /// Writes a date-time in the wire format when present
    pub fn timestamp(self, key: &str, value: Option<&Timestamp>) -> Self {
        self.optional(key, value.map(format_timestamp))
    }

    /// Writes a decimal when present
    pub fn decimal(self, key: &str, value: Option<&NumericValue>) -> Self {
        self.optional(key, value.map(decimal_value))
    }

    /// Writes a nested object when present
    pub fn object(self, key: &str, value: Option<Value>) -> Self {
        self.optional(key, value)
    }

    /// Writes an array of encoded items, skipping it when empty
    pub fn array<T>(self, key: &str, items: &[T], encode: impl Fn(&T) -> Value) -> Self {
        if items.is_empty() {
            return self;
        }
        let values: Vec<Value> = items.iter().map(encode).collect();
        self.field(key, Value::Array(values))
    }

    /// Writes `{"uuid": ...}` under `key`
    pub fn reference(self, key: &str, uuid: &str) -> Self {
        self.field(key, uuid_only(uuid))
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}

/// `{"uuid": uuid}`
pub fn uuid_only(uuid: &str) -> Value {
    JsonObject::new().field("uuid", uuid).build()
}
