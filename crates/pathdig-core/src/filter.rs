//! Path-based predicates for filtering collections of nested values.
//!
//! A [`PathFilter`] resolves a path inside each candidate and compares the
//! value found there with a target using a [`Comparison`]. Filters are plain
//! data (path, value, operator, separator) and can be reused across any
//! number of candidates, or registered as level filters on a
//! [`Resolver`](crate::Resolver).
//!
//! # Expression syntax
//!
//! [`PathFilter::parse`] accepts `<path><op><value>`:
//!
//! - `name=Erik` -- bare words are strings
//! - `name="John Alone"` -- JSON strings work too
//! - `user.profile.age>=21` -- numbers, booleans and `null` are JSON literals

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::comparison::Comparison;
use crate::error::{PathError, Result};
use crate::resolver::{Resolver, Separator};

/// A test applied to one entry of a container.
///
/// Implemented by [`PathFilter`] and by any `Fn(&Value) -> bool` closure.
pub trait Predicate: Send + Sync {
    fn test(&self, candidate: &Value) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn test(&self, candidate: &Value) -> bool {
        self(candidate)
    }
}

/// Matches containers whose value at `path` compares to `value` under `compare`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFilter {
    path: String,
    value: Value,
    compare: Comparison,
    separator: Separator,
}

impl PathFilter {
    pub fn new(path: impl Into<String>, value: impl Into<Value>, compare: Comparison) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            compare,
            separator: Separator::default(),
        }
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Parse a `<path><op><value>` expression using the default separator.
    ///
    /// The operator is the leftmost occurrence of any comparison tag, with
    /// two-character tags taking priority at the same position. The value is
    /// read as JSON when it parses, otherwise as a bare string.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidFilter`] when no operator is present or the
    /// path before it is empty.
    ///
    /// ```
    /// use pathdig_core::{Comparison, PathFilter};
    /// use serde_json::json;
    ///
    /// let filter = PathFilter::parse("user.profile.age>=21").unwrap();
    /// assert_eq!(filter.path(), "user.profile.age");
    /// assert_eq!(filter.compare(), Comparison::Ge);
    /// assert_eq!(filter.value(), &json!(21));
    /// ```
    pub fn parse(expr: &str) -> Result<Self> {
        let (start, op) = find_operator(expr).ok_or_else(|| PathError::InvalidFilter {
            expr: expr.to_string(),
            message: "missing comparison operator".to_string(),
        })?;

        let path = expr[..start].trim();
        if path.is_empty() {
            return Err(PathError::InvalidFilter {
                expr: expr.to_string(),
                message: "missing path before operator".to_string(),
            });
        }

        let raw = expr[start + op.tag().len()..].trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        Ok(Self::new(path, value, op))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn compare(&self) -> Comparison {
        self.compare
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }
}

impl Predicate for PathFilter {
    fn test(&self, candidate: &Value) -> bool {
        if !matches!(candidate, Value::Object(_) | Value::Array(_)) {
            return false;
        }

        let resolver = Resolver::new().with_separator(self.separator.clone());
        match resolver.lookup(candidate, &self.path) {
            Some(found) => self.compare.evaluate(&found, &self.value),
            None => self.compare.evaluate(&Value::Null, &self.value),
        }
    }
}

impl FromStr for PathFilter {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, self.compare, self.value)
    }
}

/// Locate the leftmost comparison tag in `expr`.
fn find_operator(expr: &str) -> Option<(usize, Comparison)> {
    expr.char_indices().find_map(|(i, _)| {
        let rest = &expr[i..];
        Comparison::ALL
            .into_iter()
            .find(|op| rest.starts_with(op.tag()))
            .map(|op| (i, op))
    })
}

/// Build a reusable predicate testing the value at `path` against `value`.
///
/// Non-container candidates never match. A path missing from the candidate
/// resolves to `null` before comparing.
///
/// ```
/// use pathdig_core::{create_path_filter, Comparison, Predicate};
/// use serde_json::json;
///
/// let is_erik = create_path_filter("name", "Erik", Comparison::Eq);
/// assert!(is_erik.test(&json!({"name": "Erik"})));
/// assert!(!is_erik.test(&json!({"name": "Not Erik"})));
/// ```
pub fn create_path_filter(
    path: impl Into<String>,
    value: impl Into<Value>,
    compare: Comparison,
) -> PathFilter {
    PathFilter::new(path, value, compare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_prefers_two_character_tags() {
        let filter = PathFilter::parse("age<=30").unwrap();
        assert_eq!(filter.compare(), Comparison::Le);
        assert_eq!(filter.value(), &json!(30));

        let filter = PathFilter::parse("status!=active").unwrap();
        assert_eq!(filter.compare(), Comparison::Ne);
        assert_eq!(filter.value(), &json!("active"));
    }

    #[test]
    fn parse_reads_json_strings_and_trims() {
        let filter = PathFilter::parse(r#" name = "John Alone" "#).unwrap();
        assert_eq!(filter.path(), "name");
        assert_eq!(filter.compare(), Comparison::Eq);
        assert_eq!(filter.value(), &json!("John Alone"));
    }

    #[test]
    fn parse_keeps_operator_characters_in_value() {
        let filter = PathFilter::parse("expr=a>=b").unwrap();
        assert_eq!(filter.compare(), Comparison::Eq);
        assert_eq!(filter.value(), &json!("a>=b"));
    }

    #[test]
    fn parse_rejects_missing_operator_or_path() {
        assert!(matches!(
            PathFilter::parse("name"),
            Err(PathError::InvalidFilter { .. })
        ));
        assert!(matches!(
            PathFilter::parse(">=3"),
            Err(PathError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn display_shows_expression() {
        let filter = create_path_filter("age", 21, Comparison::Gt);
        assert_eq!(filter.to_string(), "age>21");
    }
}
