//! Typed JSON path expressions
//!
//! A [`JsonPath`] is a sequence of object keys and array indices. A key is
//! always matched literally, so a flattened-dotted key such as
//! `personName.givenName` is a single segment, while nested access is spelled
//! as one segment per level:
//!
//! ```
//! use clinsync::domain::path::JsonPath;
//!
//! let flattened = JsonPath::from("personName.givenName");
//! let nested = JsonPath::root().key("personName").key("givenName");
//!
//! assert_eq!(flattened.to_string(), "$['personName.givenName']");
//! assert_eq!(nested.to_string(), "$['personName']['givenName']");
//! ```

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single step in a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member, matched literally
    Key(Cow<'static, str>),
    /// Array element
    Index(usize),
}

/// Path expression parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Unexpected character in the expression
    #[error("Unexpected '{found}' at position {position} in path expression")]
    UnexpectedChar { position: usize, found: char },

    /// The expression ended in the middle of a segment
    #[error("Unterminated segment in path expression")]
    UnexpectedEnd,

    /// An array index is not a number
    #[error("Invalid array index '{0}' in path expression")]
    InvalidIndex(String),
}

/// Absolute path into a JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Appends an object key
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Appends an array index
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Returns `self` followed by every segment of `other`
    pub fn join(&self, other: &JsonPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Returns the path segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True for the document root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the object keys of the path, skipping array indices
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_ref()),
            Segment::Index(_) => None,
        })
    }

    /// Looks the path up in `value`
    ///
    /// Returns `None` when any step is missing. A JSON `null` at the end of
    /// the path is returned as-is; callers decide whether null means absent.
    pub fn resolve<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => current.get(key.as_ref()),
                Segment::Index(index) => current.get(*index),
            })
    }

    /// Parses a dotted expression such as `results[0].cohort`
    ///
    /// Dots separate nested keys. A literal key containing a dot is written in
    /// bracket form: `$['personName.givenName']`.
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        let chars: Vec<char> = expression.chars().collect();
        let mut path = Self::root();
        let mut position = 0;

        if chars.first() == Some(&'$') {
            position = 1;
        }

        let mut expect_key = position == 0;
        while position < chars.len() {
            match chars[position] {
                '.' if !expect_key => {
                    position += 1;
                    expect_key = true;
                }
                '[' => {
                    let (segment, next) = parse_bracket(&chars, position)?;
                    path.segments.push(segment);
                    position = next;
                    expect_key = false;
                }
                c if expect_key && is_key_char(c) => {
                    let start = position;
                    while position < chars.len() && is_key_char(chars[position]) {
                        position += 1;
                    }
                    let key: String = chars[start..position].iter().collect();
                    path = path.key(key);
                    expect_key = false;
                }
                found => return Err(PathError::UnexpectedChar { position, found }),
            }
        }

        if expect_key && !path.is_root() {
            return Err(PathError::UnexpectedEnd);
        }
        Ok(path)
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn parse_bracket(chars: &[char], open: usize) -> Result<(Segment, usize), PathError> {
    let mut position = open + 1;
    match chars.get(position) {
        Some('\'') => {
            position += 1;
            let start = position;
            while position < chars.len() && chars[position] != '\'' {
                position += 1;
            }
            if position + 1 >= chars.len() || chars[position + 1] != ']' {
                return Err(PathError::UnexpectedEnd);
            }
            let key: String = chars[start..position].iter().collect();
            Ok((Segment::Key(Cow::Owned(key)), position + 2))
        }
        Some(_) => {
            let start = position;
            while position < chars.len() && chars[position] != ']' {
                position += 1;
            }
            if position >= chars.len() {
                return Err(PathError::UnexpectedEnd);
            }
            let digits: String = chars[start..position].iter().collect();
            let index = digits
                .parse::<usize>()
                .map_err(|_| PathError::InvalidIndex(digits.clone()))?;
            Ok((Segment::Index(index), position + 1))
        }
        None => Err(PathError::UnexpectedEnd),
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, "['{key}']")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A bare string is a single literal key
impl From<&'static str> for JsonPath {
    fn from(key: &'static str) -> Self {
        Self::root().key(key)
    }
}

impl From<&JsonPath> for JsonPath {
    fn from(path: &JsonPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_key_is_not_split() {
        let doc = json!({"personName.givenName": "Ada", "personName": {"givenName": "Grace"}});
        assert_eq!(
            JsonPath::from("personName.givenName").resolve(&doc),
            Some(&json!("Ada"))
        );
        assert_eq!(
            JsonPath::root()
                .key("personName")
                .key("givenName")
                .resolve(&doc),
            Some(&json!("Grace"))
        );
    }

    #[test]
    fn test_resolve_through_arrays() {
        let doc = json!({"results": [{"cohort": {"uuid": "c1"}}]});
        let path = JsonPath::root()
            .key("results")
            .index(0)
            .key("cohort")
            .key("uuid");
        assert_eq!(path.resolve(&doc), Some(&json!("c1")));
        assert_eq!(JsonPath::root().key("results").index(1).resolve(&doc), None);
    }

    #[test]
    fn test_parse_dotted_expression() {
        let parsed = JsonPath::parse("results[0].cohort").unwrap();
        assert_eq!(
            parsed,
            JsonPath::root().key("results").index(0).key("cohort")
        );
        assert_eq!(parsed.to_string(), "$['results'][0]['cohort']");
    }

    #[test]
    fn test_parse_bracket_literal() {
        let parsed = JsonPath::parse("$['personName.givenName']").unwrap();
        assert_eq!(parsed, JsonPath::from("personName.givenName"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            JsonPath::parse("results[x]"),
            Err(PathError::InvalidIndex(_))
        ));
        assert!(matches!(
            JsonPath::parse("results."),
            Err(PathError::UnexpectedEnd)
        ));
        assert!(matches!(
            JsonPath::parse("a..b"),
            Err(PathError::UnexpectedChar { position: 2, .. })
        ));
    }

    #[test]
    fn test_join_and_keys() {
        let base = JsonPath::root().key("members").index(2);
        let joined = base.join(&JsonPath::from("uuid"));
        assert_eq!(joined.to_string(), "$['members'][2]['uuid']");
        assert_eq!(joined.keys().collect::<Vec<_>>(), vec!["members", "uuid"]);
    }
}
