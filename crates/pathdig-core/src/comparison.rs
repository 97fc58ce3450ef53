//! Comparison operators used by path filters.
//!
//! Each operator has a fixed string tag (`=`, `!=`, `>`, `>=`, `<`, `<=`)
//! used for display, parsing and serde.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PathError;

/// How a resolved value is compared against a filter's target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Comparison {
    /// Strict equality.
    #[default]
    #[serde(rename = "=")]
    Eq,
    /// Strict inequality.
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl Comparison {
    /// All operators, in tag-matching priority order (two-character tags first).
    pub const ALL: [Comparison; 6] = [
        Comparison::Ne,
        Comparison::Ge,
        Comparison::Le,
        Comparison::Eq,
        Comparison::Gt,
        Comparison::Lt,
    ];

    /// The operator's string tag.
    pub fn tag(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
        }
    }

    /// Apply the operator to `left OP right`.
    ///
    /// `Eq`/`Ne` use strict `serde_json` equality. The ordering operators
    /// return `false` whenever the operands are not mutually ordered (see
    /// [`compare_values`]), which includes a null or absent left side.
    pub fn evaluate(self, left: &Value, right: &Value) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Ne => left != right,
            Comparison::Gt => compare_values(left, right) == Some(Ordering::Greater),
            Comparison::Ge => matches!(
                compare_values(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Comparison::Lt => compare_values(left, right) == Some(Ordering::Less),
            Comparison::Le => matches!(
                compare_values(left, right),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Comparison {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::ALL
            .into_iter()
            .find(|op| op.tag() == s)
            .ok_or_else(|| PathError::UnknownComparison(s.to_string()))
    }
}

/// Order two JSON values of the same kind.
///
/// - Numbers: integers compare exactly; anything involving a float compares as `f64`
/// - Strings: lexicographic
/// - Booleans: `false < true`
/// - Null, arrays, objects and mismatched kinds: `None`
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return Some(a.cmp(&b));
            }
            if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                return Some(a.cmp(&b));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
