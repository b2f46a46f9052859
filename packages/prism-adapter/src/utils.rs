use crate::value::LiveValue;
use prism_protocol::{PathSegment, SerializedVNode};
use regex::Regex;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Strings longer than this are cut before they cross to the panel.
pub const MAX_STRING_LENGTH: usize = 300;

/// Keys the framework uses to register context providers internally.
static INTERNAL_CONTEXT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__cC\d+").expect("context key pattern is valid"));

/// Calls `f` on `node`, then on each non-empty slot of its direct children.
///
/// Only one level deep; callers recurse themselves when they need the subtree.
pub fn traverse<N, C, F>(node: &N, actual_children: C, mut f: F)
where
    C: FnOnce(&N) -> Vec<Option<N>>,
    F: FnMut(&N),
{
    f(node);
    for child in actual_children(node).iter().flatten() {
        f(child);
    }
}

/// Deep-copies live data into plain JSON.
///
/// `get_vnode` recognises live tree nodes; whatever it returns replaces the node
/// wholesale, so no node reference survives into the result.
pub fn jsonify<N, F>(data: &LiveValue<N>, get_vnode: &F) -> Value
where
    F: Fn(&LiveValue<N>) -> Option<SerializedVNode>,
{
    transform(data, get_vnode).unwrap_or(Value::Null)
}

// `None` stands for `undefined`: dropped from objects, null inside arrays.
fn transform<N, F>(data: &LiveValue<N>, get_vnode: &F) -> Option<Value>
where
    F: Fn(&LiveValue<N>) -> Option<SerializedVNode>,
{
    if let Some(vnode) = get_vnode(data) {
        return Some(vnode.to_value());
    }

    let out = match data {
        LiveValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform(item, get_vnode).unwrap_or(Value::Null))
                .collect(),
        ),
        LiveValue::String(s) => Value::String(truncate(s)),
        LiveValue::Function(f) => json!({ "type": "function", "name": f.label() }),
        LiveValue::Null => Value::Null,
        LiveValue::Object(map) => Value::Object(
            map.iter()
                .filter_map(|(k, v)| transform(v, get_vnode).map(|v| (k.clone(), v)))
                .collect(),
        ),
        LiveValue::Undefined => return None,
        LiveValue::Bool(b) => Value::Bool(*b),
        LiveValue::Number(n) => Value::Number(n.clone()),
        LiveValue::Node(_) => SerializedVNode::new("Unknown").to_value(),
    };
    Some(out)
}

// Keeps the part *after* the limit. The panel has always displayed long strings
// this way, so the slicing is kept as is.
fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_STRING_LENGTH) {
        Some((offset, _)) => s[offset..].to_string(),
        None => s.to_string(),
    }
}

/// Shallow copy of a props bag, or `None` when there is nothing worth showing.
pub fn clean_props<N: Clone>(props: &LiveValue<N>) -> Option<BTreeMap<String, LiveValue<N>>> {
    if !props.is_truthy() {
        return None;
    }
    let out: BTreeMap<String, LiveValue<N>> = match props {
        LiveValue::Object(map) => map.clone(),
        LiveValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        _ => return None,
    };
    if out.is_empty() { None } else { Some(out) }
}

/// Drops internal provider registrations from a context object.
pub fn clean_context<N: Clone>(
    context: &BTreeMap<String, LiveValue<N>>,
) -> Option<BTreeMap<String, LiveValue<N>>> {
    let out: BTreeMap<_, _> = context
        .iter()
        .filter(|(key, _)| !INTERNAL_CONTEXT_KEY.is_match(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if out.is_empty() { None } else { Some(out) }
}

/// Deeply assigns `value` at `path` inside `obj`.
///
/// Walks every segment but the last; a missing or falsy step turns the whole
/// call into a no-op. A falsy last segment (`0`, `""`) is also a no-op.
pub fn set_in<N>(obj: &mut LiveValue<N>, path: &[PathSegment], value: LiveValue<N>) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut parent = Some(obj);
    for segment in parents {
        parent = parent
            .filter(|p| p.is_truthy())
            .and_then(|p| p.get_mut(segment));
    }

    if let Some(parent) = parent.filter(|p| p.is_truthy()) {
        if last.is_truthy() {
            parent.assign(last, value);
        }
    }
}

/// Converts a map of live data into a JSON object.
pub fn jsonify_map<N, F>(map: &BTreeMap<String, LiveValue<N>>, get_vnode: &F) -> Map<String, Value>
where
    F: Fn(&LiveValue<N>) -> Option<SerializedVNode>,
{
    map.iter()
        .filter_map(|(k, v)| transform(v, get_vnode).map(|v| (k.clone(), v)))
        .collect()
}
