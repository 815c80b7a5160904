//! Slice helpers and flat-list to tree conversion.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rand::seq::SliceRandom;
use serde_json::Value;

/// Key [`build_tree`] stores children under by default.
pub const DEFAULT_CHILDREN_KEY: &str = "children";

/// Splits `items` into consecutive groups of `size`; the last group may be
/// shorter. A `size` of zero yields no groups.
#[must_use]
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// Drops repeated items, keeping the first occurrence of each.
#[must_use]
pub fn unique<T: Clone + Eq + Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/// A shuffled copy of `items` (Fisher–Yates).
#[must_use]
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut result = items.to_vec();
    result.shuffle(&mut rand::thread_rng());
    result
}

/// Identifier text of a key value; `1` and `"1"` name the same node.
fn node_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn assemble(index: usize, items: &[Value], children: &[Vec<usize>], children_key: &str) -> Value {
    let mut node = items
        .get(index)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let nested = children
        .get(index)
        .map(|kids| {
            kids.iter()
                .map(|&kid| assemble(kid, items, children, children_key))
                .collect()
        })
        .unwrap_or_default();

    node.insert(children_key.to_string(), Value::Array(nested));
    Value::Object(node)
}

/// ## Summary
/// Nests a flat list of objects by their parent references.
///
/// Every node gets a `children_key` array. Items whose `parent_key` is
/// missing, `null`, or names an unknown id become roots. Items caught in a
/// parent cycle are unreachable from any root and are dropped.
///
/// ```
/// use serde_json::json;
/// use stz_util::array::{DEFAULT_CHILDREN_KEY, build_tree};
///
/// let items = [
///     json!({"id": 1, "parent": null}),
///     json!({"id": 2, "parent": 1}),
/// ];
/// let tree = build_tree(&items, "id", "parent", DEFAULT_CHILDREN_KEY);
/// assert_eq!(tree[0]["children"][0]["id"], 2);
/// ```
#[must_use]
pub fn build_tree(
    items: &[Value],
    id_key: &str,
    parent_key: &str,
    children_key: &str,
) -> Vec<Value> {
    let positions: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| node_key(item.get(id_key)).map(|id| (id, i)))
        .collect();

    let mut children = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let parent = node_key(item.get(parent_key)).and_then(|key| positions.get(&key).copied());
        match parent.and_then(|p| children.get_mut(p)) {
            Some(siblings) => siblings.push(i),
            None => roots.push(i),
        }
    }

    roots
        .into_iter()
        .map(|root| assemble(root, items, &children, children_key))
        .collect()
}
