//! Representation specs
//!
//! A representation spec names the fields, and nested sub-shapes, that a codec
//! expects the server to return for one entity type:
//!
//! ```text
//! (uuid,name,patient:(uuid,gender),location:(uuid,name))
//! ```
//!
//! ASCII whitespace between tokens is ignored on parse; `Display` renders
//! the compact form that is sent as the `v=custom:` request parameter. The
//! parsed [`Representation`] tree is used to check that every path a codec
//! reads was actually requested.

use super::path::JsonPath;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Representation spec parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepresentationError {
    /// Unexpected character
    #[error("Unexpected '{found}' at position {position} in representation")]
    UnexpectedChar { position: usize, found: char },

    /// Input ended before the closing parenthesis
    #[error("Unexpected end of representation")]
    UnexpectedEnd,

    /// `()` with no fields
    #[error("Empty field group at position {0}")]
    EmptyGroup(usize),

    /// The same field is listed twice in one group
    #[error("Duplicate field '{0}' in representation")]
    DuplicateField(String),
}

/// One entry of a representation group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationField {
    name: String,
    nested: Option<Representation>,
}

impl RepresentationField {
    /// Field name as sent to the server
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested sub-shape, for object-valued fields
    pub fn nested(&self) -> Option<&Representation> {
        self.nested.as_ref()
    }
}

/// Parsed representation spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    fields: Vec<RepresentationField>,
}

impl Representation {
    /// Parses a representation string
    ///
    /// # Examples
    ///
    /// ```
    /// use clinsync::domain::representation::Representation;
    ///
    /// let repr = Representation::parse("(uuid,name,location:(uuid,name))").unwrap();
    /// assert!(repr.contains("name"));
    /// assert!(repr.nested("location").unwrap().contains("uuid"));
    /// ```
    pub fn parse(input: &str) -> Result<Self, RepresentationError> {
        let mut parser = Parser {
            chars: input.trim().chars().collect(),
            position: 0,
        };
        let representation = parser.group()?;
        parser.skip_whitespace();
        if let Some(&found) = parser.chars.get(parser.position) {
            return Err(RepresentationError::UnexpectedChar {
                position: parser.position,
                found,
            });
        }
        Ok(representation)
    }

    /// Returns the top-level fields in declaration order
    pub fn fields(&self) -> &[RepresentationField] {
        &self.fields
    }

    /// Looks up a top-level field
    pub fn field(&self, name: &str) -> Option<&RepresentationField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the sub-shape requested for `name`
    pub fn nested(&self, name: &str) -> Option<&Representation> {
        self.field(name).and_then(RepresentationField::nested)
    }

    /// True when `name` is requested at the top level
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// True when every key of `path` was requested
    ///
    /// Array indices are transparent. A flattened-dotted key `a.b` is covered
    /// either by a literal `a.b` field or by `a:(b)`. Reading an object-valued
    /// field as a whole is covered by its name alone.
    pub fn covers(&self, path: &JsonPath) -> bool {
        let keys: Vec<&str> = path.keys().collect();
        self.covers_keys(&keys)
    }

    fn covers_keys(&self, keys: &[&str]) -> bool {
        let Some((first, rest)) = keys.split_first() else {
            return true;
        };

        if let Some(field) = self.field(first) {
            if rest.is_empty() {
                return true;
            }
            if let Some(nested) = &field.nested {
                if nested.covers_keys(rest) {
                    return true;
                }
            }
        }

        if let Some((head, tail)) = first.split_once('.') {
            let mut expanded = vec![head, tail];
            expanded.extend_from_slice(rest);
            return self.covers_keys(&expanded);
        }
        false
    }

    /// Renders the value of the `v` download parameter
    pub fn as_query_value(&self) -> String {
        format!("custom:{self}")
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", field.name)?;
            if let Some(nested) = &field.nested {
                write!(f, ":{nested}")?;
            }
        }
        write!(f, ")")
    }
}

impl FromStr for Representation {
    type Err = RepresentationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser {
    chars: Vec<char>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), RepresentationError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(RepresentationError::UnexpectedChar {
                position: self.position,
                found,
            }),
            None => Err(RepresentationError::UnexpectedEnd),
        }
    }

    fn group(&mut self) -> Result<Representation, RepresentationError> {
        self.skip_whitespace();
        let open = self.position;
        self.expect('(')?;
        self.skip_whitespace();
        if self.peek() == Some(')') {
            return Err(RepresentationError::EmptyGroup(open));
        }

        let mut fields: Vec<RepresentationField> = Vec::new();
        loop {
            let field = self.field()?;
            if fields.iter().any(|existing| existing.name == field.name) {
                return Err(RepresentationError::DuplicateField(field.name));
            }
            fields.push(field);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.position += 1,
                Some(')') => {
                    self.position += 1;
                    return Ok(Representation { fields });
                }
                Some(found) => {
                    return Err(RepresentationError::UnexpectedChar {
                        position: self.position,
                        found,
                    })
                }
                None => return Err(RepresentationError::UnexpectedEnd),
            }
        }
    }

    fn field(&mut self) -> Result<RepresentationField, RepresentationError> {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.position += 1;
            } else {
                break;
            }
        }
        if self.position == start {
            return match self.peek() {
                Some(found) => Err(RepresentationError::UnexpectedChar {
                    position: start,
                    found,
                }),
                None => Err(RepresentationError::UnexpectedEnd),
            };
        }
        let name: String = self.chars[start..self.position].iter().collect();

        self.skip_whitespace();
        let nested = if self.peek() == Some(':') {
            self.position += 1;
            Some(self.group()?)
        } else {
            None
        };
        Ok(RepresentationField { name, nested })
    }
}
