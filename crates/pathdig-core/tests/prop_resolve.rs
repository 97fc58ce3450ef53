/// Property-based tests for path resolution.
///
/// Uses `proptest` to generate nested JSON values and paths, and checks:
/// - the empty path returns the input unchanged
/// - every path built from real keys resolves to the value reached by
///   indexing step by step
/// - a path extended past a scalar resolves to the default
/// - path filters are idempotent, and `Eq` filters agree with `resolve`
use pathdig_core::{create_path_filter, filter_entries, resolve, Comparison, Predicate, Resolver};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Keys without the default separator, so paths built from them split back
/// into the same segments.
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,8}").unwrap()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Every walkable path in `value`, paired with the value it reaches.
fn all_paths(value: &Value, prefix: Vec<String>, out: &mut Vec<(Vec<String>, Value)>) {
    let children: Vec<(String, &Value)> = match value {
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => Vec::new(),
    };
    for (key, child) in children {
        let mut path = prefix.clone();
        path.push(key);
        out.push((path.clone(), child.clone()));
        all_paths(child, path, out);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn empty_path_is_identity(value in arb_value()) {
        prop_assert_eq!(resolve(&value, ""), value);
    }

    #[test]
    fn walkable_paths_resolve_to_indexed_value(value in arb_value()) {
        let mut paths = Vec::new();
        all_paths(&value, Vec::new(), &mut paths);
        for (segments, expected) in paths {
            prop_assert_eq!(resolve(&value, &segments.join(".")), expected);
        }
    }

    #[test]
    fn descending_past_a_scalar_yields_default(value in arb_value(), key in arb_key()) {
        let mut paths = Vec::new();
        all_paths(&value, Vec::new(), &mut paths);
        let resolver = Resolver::new().with_default("missing");
        for (mut segments, reached) in paths {
            if !matches!(reached, Value::Array(_) | Value::Object(_)) {
                segments.push(key.clone());
                prop_assert_eq!(resolver.resolve(&value, &segments.join(".")), Value::from("missing"));
            }
        }
    }

    #[test]
    fn path_filters_are_idempotent(value in arb_value(), target in arb_scalar()) {
        let filter = create_path_filter("a", target, Comparison::Ge);
        prop_assert_eq!(filter.test(&value), filter.test(&value));
    }

    #[test]
    fn eq_filter_agrees_with_resolve(value in arb_value(), key in arb_key(), target in arb_scalar()) {
        let filter = create_path_filter(key.clone(), target.clone(), Comparison::Eq);
        let is_container = matches!(value, Value::Array(_) | Value::Object(_));
        prop_assert_eq!(filter.test(&value), is_container && resolve(&value, &key) == target);
    }

    #[test]
    fn filtering_arrays_never_grows_them(items in prop::collection::vec(arb_value(), 0..8), target in arb_scalar()) {
        let list = Value::Array(items.clone());
        let filter = create_path_filter("a", target, Comparison::Ne);
        let filtered = filter_entries(&list, &filter);
        let kept = filtered.as_array().unwrap();
        prop_assert!(kept.len() <= items.len());
        prop_assert!(kept.iter().all(|v| filter.test(v)));
    }
}
