//! # pathdig-core
//!
//! Nested path lookup for JSON-shaped data, with per-level filters.
//!
//! A path like `"1.children.0.name"` walks arrays by index and objects by
//! key. When the path cannot be walked the lookup returns a default value
//! instead of failing. Filters built with [`create_path_filter`] narrow the
//! container at a given level before the walk continues, and double as
//! standalone predicates for filtering record lists.
//!
//! ## Quick start
//!
//! ```rust
//! use pathdig_core::{create_path_filter, filter_entries, resolve, Comparison};
//! use serde_json::json;
//!
//! let users = json!([
//!     {"user": {"profile": {"age": 20}}},
//!     {"user": {"profile": {"age": 25}}},
//! ]);
//! assert_eq!(resolve(&users, "1.user.profile.age"), json!(25));
//!
//! let adults = filter_entries(&users, &create_path_filter("user.profile.age", 21, Comparison::Ge));
//! assert_eq!(resolve(&adults, "0.user.profile.age"), json!(25));
//! ```
//!
//! ## Modules
//!
//! - [`resolver`] -- path walking, level filters, container classification
//! - [`filter`] -- `Predicate` trait and path-based `PathFilter`
//! - [`comparison`] -- the six comparison operators and value ordering
//! - [`error`] -- Error types for configuration and parsing failures

pub mod comparison;
pub mod error;
pub mod filter;
pub mod resolver;

pub use comparison::Comparison;
pub use error::PathError;
pub use filter::{create_path_filter, PathFilter, Predicate};
pub use resolver::{
    filter_entries, resolve, resolve_json, ContainerKind, LevelFilters, ResolveOptions, Resolver,
    Separator,
};
