//! Deep operations over JSON object trees.

use serde_json::{Map, Value};

use crate::error::{UtilError, UtilResult};

/// Keys [`merge`] never copies from a source object.
const UNSAFE_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// An independent copy of the whole tree.
#[must_use]
pub fn clone_deep(value: &Value) -> Value {
    value.clone()
}

/// ## Summary
/// Deep-merges `source` over `target` into a new object.
///
/// Nested objects present on both sides merge recursively; arrays, scalars
/// and `null` from `source` replace the target value. The keys
/// `__proto__`, `constructor` and `prototype` are ignored. A side that is
/// not an object counts as `{}`.
///
/// ```
/// use serde_json::json;
/// use stz_util::object::merge;
///
/// let merged = merge(&json!({"a": {"x": 1, "y": 2}}), &json!({"a": {"y": 3}}));
/// assert_eq!(merged, json!({"a": {"x": 1, "y": 3}}));
/// ```
#[must_use]
pub fn merge(target: &Value, source: &Value) -> Value {
    let mut result = target.as_object().cloned().unwrap_or_default();
    let Some(source) = source.as_object() else {
        return Value::Object(result);
    };

    for (key, incoming) in source {
        if UNSAFE_KEYS.contains(&key.as_str()) {
            tracing::debug!(key, "Skipping unsafe key during merge");
            continue;
        }

        let merged = match (result.get(key), incoming) {
            (Some(existing @ Value::Object(_)), Value::Object(_)) => merge(existing, incoming),
            _ => incoming.clone(),
        };
        result.insert(key.clone(), merged);
    }

    Value::Object(result)
}

/// Removes `keys` from every object in the tree, arrays included.
#[must_use]
pub fn omit(value: &Value, keys: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !keys.contains(&key.as_str()))
                .map(|(key, child)| (key.clone(), omit(child, keys)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|item| omit(item, keys)).collect()),
        scalar => scalar.clone(),
    }
}

/// ## Summary
/// A shallow copy of `object` with `property` taken out.
///
/// ```
/// use serde_json::json;
/// use stz_util::object::pick;
///
/// let rest = pick(&json!({"id": 1, "name": "a"}), "id").expect("id is present");
/// assert_eq!(rest, json!({"name": "a"}));
/// ```
///
/// ## Errors
/// Returns [`UtilError::MissingProperty`] if `object` is not an object or
/// has no such key.
pub fn pick(object: &Value, property: &str) -> UtilResult<Value> {
    let mut rest: Map<String, Value> = object
        .as_object()
        .filter(|map| map.contains_key(property))
        .cloned()
        .ok_or_else(|| UtilError::MissingProperty(property.to_string()))?;
    rest.remove(property);
    Ok(Value::Object(rest))
}

/// ## Summary
/// Structural equality where numbers compare by value, so `1` equals `1.0`.
#[must_use]
pub fn is_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y).is_eq(),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| is_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| is_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_clone_deep_is_independent() {
        let original = json!({"a": {"b": [1, 2, {"c": 3}]}});
        let mut copy = clone_deep(&original);
        copy["a"]["b"][2]["c"] = json!(4);

        assert_eq!(original["a"]["b"][2]["c"], 3);
        assert_eq!(copy["a"]["b"][2]["c"], 4);
    }

    #[test]
    fn test_merge_nested() {
        let target = json!({"a": 1, "nested": {"x": 1, "y": {"deep": true}}, "list": [1, 2]});
        let source = json!({"b": 2, "nested": {"y": {"extra": 1}}, "list": [3]});

        assert_eq!(
            merge(&target, &source),
            json!({
                "a": 1,
                "b": 2,
                "nested": {"x": 1, "y": {"deep": true, "extra": 1}},
                "list": [3]
            })
        );
    }

    #[test]
    fn test_merge_replacements() {
        let target = json!({"obj": {"x": 1}, "scalar": {"x": 1}, "gone": 5});
        let source = json!({"obj": "text", "scalar": {"y": 2}, "gone": null});

        assert_eq!(
            merge(&target, &source),
            json!({"obj": "text", "scalar": {"x": 1, "y": 2}, "gone": null})
        );
    }

    #[test_log::test]
    fn test_merge_ignores_unsafe_keys() {
        let source = json!({
            "__proto__": {"polluted": true},
            "constructor": 1,
            "prototype": 2,
            "ok": 3
        });
        assert_eq!(merge(&json!({}), &source), json!({"ok": 3}));
    }

    #[test]
    fn test_merge_non_objects() {
        assert_eq!(merge(&json!([1]), &json!({"a": 1})), json!({"a": 1}));
        assert_eq!(merge(&json!({"a": 1}), &json!("x")), json!({"a": 1}));
        assert_eq!(merge(&json!(null), &json!(null)), json!({}));
    }

    #[test]
    fn test_omit_recursive() {
        let value = json!({
            "id": 1,
            "password": "x",
            "profile": {"password": "y", "name": "n"},
            "items": [{"password": "z", "v": 1}, 2]
        });
        assert_eq!(
            omit(&value, &["password"]),
            json!({"id": 1, "profile": {"name": "n"}, "items": [{"v": 1}, 2]})
        );
        assert_eq!(omit(&json!("plain"), &["a"]), json!("plain"));
    }

    #[test]
    fn test_pick_removes_property() {
        let value = json!({"a": 1, "b": {"c": 2}, "d": null});

        let rest = pick(&value, "b").expect("b is present");
        assert_eq!(rest, json!({"a": 1, "d": null}));
        assert_eq!(value["b"]["c"], 2);

        let rest = pick(&value, "d").expect("null values still count as present");
        assert_eq!(rest, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_pick_missing_property() {
        let result = pick(&json!({"a": 1}), "missing");
        assert!(matches!(result, Err(UtilError::MissingProperty(ref key)) if key == "missing"));

        assert!(pick(&json!([1, 2]), "0").is_err());
        assert!(pick(&json!(null), "a").is_err());
    }

    #[test]
    fn test_is_equal() {
        assert!(is_equal(&json!({"a": [1, {"b": 2}]}), &json!({"a": [1.0, {"b": 2}]})));
        assert!(!is_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!is_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!is_equal(&json!("1"), &json!(1)));
        assert!(is_equal(&json!(null), &json!(null)));
    }
}
