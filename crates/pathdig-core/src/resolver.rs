//! Nested path resolution with optional per-level filters.
//!
//! A path such as `"0.children.1.name"` is split on a separator and walked
//! left to right through arrays and objects. A missing key, or a scalar where
//! a container was expected, stops the walk and yields the caller's default.
//!
//! Filters can be registered per level. The filter for level `i` runs on the
//! container reached *before* segment `i` is looked up, so
//! `"0.children.1.name"` with a filter at level 0 first narrows the root list,
//! renumbers the survivors, and then takes element `0` of what is left.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{PathError, Result};
use crate::filter::Predicate;

/// The string a path is split on. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Separator(String);

impl Separator {
    /// Validate a separator.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptySeparator`] for `""`.
    pub fn new(separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(PathError::EmptySeparator);
        }
        Ok(Self(separator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a path into segments. Empty segments are kept.
    pub fn split<'a>(&'a self, path: &'a str) -> std::str::Split<'a, &'a str> {
        path.split(self.0.as_str())
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(".".to_string())
    }
}

impl TryFrom<String> for Separator {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Separator> for String {
    fn from(value: Separator) -> Self {
        value.0
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializable resolver settings.
///
/// ```
/// use pathdig_core::ResolveOptions;
///
/// let options: ResolveOptions = serde_json::from_str(r#"{"separator":"/"}"#).unwrap();
/// assert_eq!(options.separator.as_str(), "/");
/// assert!(options.default.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub separator: Separator,
    /// Returned when the path cannot be walked.
    pub default: Value,
}

/// Whether a container behaves as a list or as a map when filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Arrays, and objects keyed exactly `"0"..."n-1"` in order.
    List,
    Map,
}

impl ContainerKind {
    /// Classify a value. Scalars are not containers and yield `None`.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(ContainerKind::List),
            Value::Object(map) => {
                let sequential = map
                    .keys()
                    .enumerate()
                    .all(|(i, key)| list_index(key) == Some(i));
                Some(if sequential {
                    ContainerKind::List
                } else {
                    ContainerKind::Map
                })
            }
            _ => None,
        }
    }
}

/// Parse a segment as a list index.
///
/// Only canonical non-negative decimals qualify: `"0"` and `"12"`, but not
/// `"01"`, `"+1"` or `"-1"`.
pub(crate) fn list_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// Sparse mapping from path level to the predicate applied at that level.
#[derive(Clone, Default)]
pub struct LevelFilters {
    filters: BTreeMap<usize, Arc<dyn Predicate>>,
}

impl LevelFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `predicate` for `level`, replacing any previous one.
    pub fn insert(&mut self, level: usize, predicate: impl Predicate + 'static) {
        self.filters.insert(level, Arc::new(predicate));
    }

    pub fn get(&self, level: usize) -> Option<&dyn Predicate> {
        self.filters.get(&level).map(|p| p.as_ref())
    }

    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.filters.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for LevelFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelFilters")
            .field("levels", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Walks paths through nested values.
///
/// # Examples
///
/// ```
/// use pathdig_core::{create_path_filter, Comparison, Resolver};
/// use serde_json::json;
///
/// let data = json!([
///     {"name": "John Parent", "children": [{"name": "Freeloader Child"}]},
///     {"name": "John Alone", "children": [{"name": "Good Kid"}, {"name": "Bad Kid"}]}
/// ]);
///
/// let resolver = Resolver::new()
///     .with_filter(0, create_path_filter("name", "John Alone", Comparison::Eq));
/// assert_eq!(resolver.resolve(&data, "0.children.1.name"), json!("Bad Kid"));
///
/// let resolver = Resolver::new().with_default("Not Found");
/// assert_eq!(resolver.resolve(&data, "0.children.0.typo"), json!("Not Found"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    separator: Separator,
    default: Value,
    filters: LevelFilters,
}

impl Resolver {
    /// A resolver splitting on `.` with a `null` default and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: ResolveOptions) -> Self {
        Self {
            separator: options.separator,
            default: options.default,
            filters: LevelFilters::new(),
        }
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Register a filter for the container reached before segment `level`.
    pub fn with_filter(mut self, level: usize, predicate: impl Predicate + 'static) -> Self {
        self.filters.insert(level, predicate);
        self
    }

    pub fn with_filters(mut self, filters: LevelFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn filters(&self) -> &LevelFilters {
        &self.filters
    }

    /// Resolve `path`, returning the configured default when it cannot be walked.
    pub fn resolve(&self, container: &Value, path: &str) -> Value {
        match self.lookup(container, path) {
            Some(found) => found.into_owned(),
            None => self.default.clone(),
        }
    }

    /// Resolve `path` without substituting the default.
    ///
    /// Returns a borrow into `container` while no filter has run; once a
    /// level filter rebuilds a container the remaining walk owns its values.
    pub fn lookup<'a>(&self, container: &'a Value, path: &str) -> Option<Cow<'a, Value>> {
        if path.is_empty() {
            return Some(Cow::Borrowed(container));
        }

        let mut current = Cow::Borrowed(container);

        for (level, segment) in self.separator.split(path).enumerate() {
            if let Some(predicate) = self.filters.get(level) {
                if ContainerKind::of(&current).is_some() {
                    current = Cow::Owned(filter_entries(&current, predicate));
                    trace!(depth = level, "level filter applied");
                }
            }

            current = match descend(current, segment) {
                Some(next) => next,
                None => {
                    trace!(depth = level, segment, "path not found");
                    return None;
                }
            };
        }

        Some(current)
    }
}

/// Step one level down, keeping borrowed values borrowed.
fn descend<'a>(current: Cow<'a, Value>, segment: &str) -> Option<Cow<'a, Value>> {
    match current {
        Cow::Borrowed(value) => child(value, segment).map(Cow::Borrowed),
        Cow::Owned(value) => take_child(value, segment).map(Cow::Owned),
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => list_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn take_child(value: Value, segment: &str) -> Option<Value> {
    match value {
        Value::Object(mut map) => map.remove(segment),
        Value::Array(mut items) => list_index(segment)
            .filter(|&i| i < items.len())
            .map(|i| items.swap_remove(i)),
        _ => None,
    }
}

/// Keep the entries of a container whose values satisfy `predicate`.
///
/// The container's [`ContainerKind`] is decided before filtering: list-like
/// containers are renumbered from zero, map-like containers keep their keys.
/// Scalars are returned unchanged.
///
/// ```
/// use pathdig_core::{create_path_filter, filter_entries, Comparison};
/// use serde_json::json;
///
/// let people = json!([{"age": 20}, {"age": 25}, {"age": 30}]);
/// let adults = filter_entries(&people, &create_path_filter("age", 21, Comparison::Ge));
/// assert_eq!(adults, json!([{"age": 25}, {"age": 30}]));
/// ```
pub fn filter_entries<P: Predicate + ?Sized>(container: &Value, predicate: &P) -> Value {
    match (container, ContainerKind::of(container)) {
        (Value::Array(items), _) => Value::Array(
            items
                .iter()
                .filter(|item| predicate.test(item))
                .cloned()
                .collect(),
        ),
        (Value::Object(map), Some(ContainerKind::List)) => Value::Object(
            map.values()
                .filter(|item| predicate.test(item))
                .enumerate()
                .map(|(i, item)| (i.to_string(), item.clone()))
                .collect::<Map<String, Value>>(),
        ),
        (Value::Object(map), _) => Value::Object(
            map.iter()
                .filter(|(_, item)| predicate.test(item))
                .map(|(key, item)| (key.clone(), item.clone()))
                .collect::<Map<String, Value>>(),
        ),
        (other, _) => other.clone(),
    }
}

/// Resolve `path` in `container` with the default separator, returning `null`
/// when the path cannot be walked.
///
/// ```
/// use pathdig_core::resolve;
/// use serde_json::json;
///
/// let data = json!({"user": {"profile": {"age": 25}}});
/// assert_eq!(resolve(&data, "user.profile.age"), json!(25));
/// assert_eq!(resolve(&data, "user.email"), json!(null));
/// assert_eq!(resolve(&data, ""), data);
/// ```
pub fn resolve(container: &Value, path: &str) -> Value {
    Resolver::new().resolve(container, path)
}

/// Parse a JSON document and resolve `path` in it.
///
/// # Errors
///
/// Returns an error if `json` is not valid JSON. A path that cannot be
/// walked is not an error and yields `null`.
pub fn resolve_json(json: &str, path: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json)?;
    Ok(resolve(&value, path))
}
