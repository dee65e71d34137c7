//! Path expressions over JSON documents.
//!
//! Grammar:
//!
//! ```text
//! path     := "$" | ["$."] segment ("." name | bracket)*
//! segment  := name | bracket
//! bracket  := "[" quote key quote "]"
//! ```
//!
//! `$` alone addresses the whole document. Bracketed keys allow field names
//! containing dots. Arrays are not indexable: `[0]` is rejected.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// Root sentinel addressing the whole document.
pub const ROOT: &str = "$";

/// Errors produced while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The expression is empty or whitespace.
    #[error("path expression is empty")]
    Empty,

    /// `$` followed by something other than `.` or `[`.
    #[error("invalid root in '{0}': expected '$', '$.field' or '$[...]'")]
    InvalidRoot(String),

    /// Two separators in a row, or a leading/trailing separator.
    #[error("empty field name in '{0}'")]
    EmptySegment(String),

    /// A `[` or quote without its closing counterpart.
    #[error("unterminated bracket in '{0}'")]
    UnterminatedBracket(String),

    /// Array indexing, which the grammar does not support.
    #[error("array index '[{0}]' is not supported")]
    IndexNotSupported(String),

    /// Bracket contents that are neither a quoted key nor an index.
    #[error("bracketed key '{0}' must be quoted")]
    UnquotedBracket(String),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    raw: String,
    segments: Vec<String>,
}

impl PathExpr {
    /// The root expression (`$`).
    #[must_use]
    pub fn root() -> Self {
        Self {
            raw: ROOT.to_string(),
            segments: Vec::new(),
        }
    }

    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns a `PathError` describing the first syntax problem found.
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        let raw = expr.trim();
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let rest = match raw.strip_prefix('$') {
            Some("") => return Ok(Self::root()),
            Some(after) => {
                if let Some(fields) = after.strip_prefix('.') {
                    fields
                } else if after.starts_with('[') {
                    after
                } else {
                    return Err(PathError::InvalidRoot(raw.to_string()));
                }
            }
            None => raw,
        };

        Ok(Self {
            raw: raw.to_string(),
            segments: parse_segments(raw, rest)?,
        })
    }

    /// Returns true for the root expression.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Field names walked from the root, in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The expression as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PathExpr {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segments(raw: &str, mut remaining: &str) -> Result<Vec<String>, PathError> {
    let mut segments = Vec::new();

    loop {
        if let Some(inner) = remaining.strip_prefix('[') {
            let (key, after) = parse_bracket(raw, inner)?;
            segments.push(key);
            remaining = after;
        } else {
            let end = remaining.find(['.', '[']).unwrap_or(remaining.len());
            let name = &remaining[..end];
            if name.is_empty() {
                return Err(PathError::EmptySegment(raw.to_string()));
            }
            segments.push(name.to_string());
            remaining = &remaining[end..];
        }

        if remaining.is_empty() {
            return Ok(segments);
        }
        if let Some(after_dot) = remaining.strip_prefix('.') {
            if after_dot.is_empty() || after_dot.starts_with('[') {
                return Err(PathError::EmptySegment(raw.to_string()));
            }
            remaining = after_dot;
        }
    }
}

/// Parses the inside of a bracket (after `[`), returning the key and the
/// text following the closing `]`.
fn parse_bracket<'a>(raw: &str, inner: &'a str) -> Result<(String, &'a str), PathError> {
    let unterminated = || PathError::UnterminatedBracket(raw.to_string());

    if let Some(quote) = inner.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &inner[1..];
        let end = body.find(quote).ok_or_else(unterminated)?;
        let after = body[end + 1..].strip_prefix(']').ok_or_else(unterminated)?;
        return Ok((body[..end].to_string(), after));
    }

    let close = inner.find(']').ok_or_else(unterminated)?;
    let content = inner[..close].trim();
    if content == "*" || content.parse::<i64>().is_ok() {
        Err(PathError::IndexNotSupported(content.to_string()))
    } else {
        Err(PathError::UnquotedBracket(content.to_string()))
    }
}

/// Outcome of resolving a path against a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extraction<'a> {
    /// The path resolved; the value may itself be `null`.
    Value(&'a Value),
    /// Result of a key-presence lookup.
    KeyExists(bool),
    /// Some field along the path is absent.
    NotFound,
}

impl<'a> Extraction<'a> {
    /// The resolved value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true unless the path was not found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Resolves `path` against `tree`.
///
/// A field that is present with a `null` value resolves to `Value(null)`;
/// a missing field, or an attempt to descend into a non-object, yields
/// `NotFound`.
#[must_use]
pub fn extract<'a>(tree: &'a Value, path: &PathExpr) -> Extraction<'a> {
    path.segments
        .iter()
        .try_fold(tree, |node, key| node.as_object()?.get(key))
        .map_or(Extraction::NotFound, Extraction::Value)
}

/// Checks whether the object at `path` has `key`, ignoring its value.
///
/// Yields `NotFound` when `path` itself does not resolve, and
/// `KeyExists(false)` when it resolves to something other than an object.
#[must_use]
pub fn extract_key(tree: &Value, path: &PathExpr, key: &str) -> Extraction<'static> {
    match extract(tree, path) {
        Extraction::Value(node) => Extraction::KeyExists(
            node.as_object().is_some_and(|object| object.contains_key(key)),
        ),
        _ => Extraction::NotFound,
    }
}
