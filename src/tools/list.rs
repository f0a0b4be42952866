//! List and slice helpers.

use regex::Regex;
use serde_json::Value;

/// Checks whether `item` exists in `list`.
pub fn exist_in_slice(item: &str, list: &[&str]) -> bool {
    list.iter().any(|entry| *entry == item)
}

/// Checks whether `value` matches at least one of `patterns`.
///
/// Entries starting with `^` are treated as anchored regular
/// expressions; everything else is compared for plain equality.
/// Patterns that fail to compile never match. An empty `patterns`
/// list applies no filtering and matches every value.
pub fn exist_in_slice_with_regex(value: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return true;
    }

    patterns.iter().any(|pattern| {
        if pattern.starts_with('^') {
            Regex::new(pattern)
                .map(|re| re.is_match(value))
                .unwrap_or(false)
        } else {
            pattern == value
        }
    })
}

/// Coerces a JSON value into a deduplicated string slice, preserving
/// first-seen order.
///
/// Scalars (strings, numbers, bools) become a single-element slice,
/// `null` and the empty string become an empty slice, and arrays
/// flatten their scalar elements. Nested arrays and objects are
/// skipped.
pub fn to_unique_string_slice(value: &Value) -> Vec<String> {
    let mut result = Vec::new();

    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(s) = scalar_to_string(item) {
                    push_unique(&mut result, s);
                }
            }
        }
        other => {
            if let Some(s) = scalar_to_string(other) {
                push_unique(&mut result, s);
            }
        }
    }

    result
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exist_in_slice() {
        let list = ["id", "created", "updated"];
        assert!(exist_in_slice("id", &list));
        assert!(exist_in_slice("updated", &list));
        assert!(!exist_in_slice("missing", &list));
        assert!(!exist_in_slice("", &list));
    }

    #[test]
    fn test_exist_in_slice_with_regex() {
        let patterns = vec![r"^\w+[\w.]*$".to_string(), "@request.method".to_string()];

        assert!(exist_in_slice_with_regex("title", &patterns));
        assert!(exist_in_slice_with_regex("rel.title", &patterns));
        assert!(exist_in_slice_with_regex("@request.method", &patterns));
        assert!(!exist_in_slice_with_regex("@request.auth.id", &patterns));
        assert!(!exist_in_slice_with_regex("bad value", &patterns));
    }

    #[test]
    fn test_exist_in_slice_with_invalid_regex() {
        let patterns = vec!["^([".to_string()];
        assert!(!exist_in_slice_with_regex("anything", &patterns));
    }

    #[test]
    fn test_exist_in_slice_with_empty_patterns_matches_all() {
        assert!(exist_in_slice_with_regex("anything", &[]));
        assert!(exist_in_slice_with_regex("", &[]));
    }

    #[test]
    fn test_to_unique_string_slice_scalars() {
        assert_eq!(to_unique_string_slice(&json!("test")), vec!["test"]);
        assert_eq!(to_unique_string_slice(&json!(123)), vec!["123"]);
        assert_eq!(to_unique_string_slice(&json!(true)), vec!["true"]);
        assert!(to_unique_string_slice(&json!(null)).is_empty());
        assert!(to_unique_string_slice(&json!("")).is_empty());
    }

    #[test]
    fn test_to_unique_string_slice_arrays() {
        assert_eq!(
            to_unique_string_slice(&json!(["a", "b", "a", 1])),
            vec!["a", "b", "1"]
        );
        assert!(to_unique_string_slice(&json!([])).is_empty());
        assert_eq!(
            to_unique_string_slice(&json!(["x", null, ["nested"], {"k": 1}])),
            vec!["x"]
        );
    }
}
