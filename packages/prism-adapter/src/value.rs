use prism_protocol::PathSegment;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// How many holes an assignment may open past the end of an array.
pub const MAX_ARRAY_GAP: usize = 1024;

/// A function as it appears inside live data. Only its names survive inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

impl Function {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            display_name: None,
        }
    }

    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("anonymous")
    }
}

/// Any value held by the running tree: props, state, hook values, context.
///
/// `N` is the renderer's handle for a live tree node, which may show up anywhere
/// inside props (children, render props, refs).
#[derive(Debug, Clone, PartialEq)]
pub enum LiveValue<N> {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<LiveValue<N>>),
    Object(BTreeMap<String, LiveValue<N>>),
    Function(Function),
    Node(N),
}

impl<N> Default for LiveValue<N> {
    fn default() -> Self {
        LiveValue::Undefined
    }
}

impl<N> LiveValue<N> {
    pub fn object() -> Self {
        LiveValue::Object(BTreeMap::new())
    }

    /// Truthiness as the inspected runtime defines it.
    pub fn is_truthy(&self) -> bool {
        match self {
            LiveValue::Undefined | LiveValue::Null => false,
            LiveValue::Bool(b) => *b,
            LiveValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            LiveValue::String(s) => !s.is_empty(),
            LiveValue::Array(_)
            | LiveValue::Object(_)
            | LiveValue::Function(_)
            | LiveValue::Node(_) => true,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, LiveValue<N>>> {
        match self {
            LiveValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            LiveValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn get(&self, segment: &PathSegment) -> Option<&LiveValue<N>> {
        match (self, segment) {
            (LiveValue::Object(map), PathSegment::Key(k)) => map.get(k),
            (LiveValue::Object(map), PathSegment::Index(i)) => map.get(&i.to_string()),
            (LiveValue::Array(items), PathSegment::Index(i)) => {
                usize::try_from(*i).ok().and_then(|i| items.get(i))
            }
            (LiveValue::Array(items), PathSegment::Key(k)) => {
                k.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, segment: &PathSegment) -> Option<&mut LiveValue<N>> {
        match (self, segment) {
            (LiveValue::Object(map), PathSegment::Key(k)) => map.get_mut(k),
            (LiveValue::Object(map), PathSegment::Index(i)) => map.get_mut(&i.to_string()),
            (LiveValue::Array(items), PathSegment::Index(i)) => {
                usize::try_from(*i).ok().and_then(move |i| items.get_mut(i))
            }
            (LiveValue::Array(items), PathSegment::Key(k)) => {
                k.parse::<usize>().ok().and_then(move |i| items.get_mut(i))
            }
            _ => None,
        }
    }

    /// Writes `value` into this container. Returns `false` when `self` cannot hold keys
    /// or when an array index lies more than [`MAX_ARRAY_GAP`] past the end.
    pub fn assign(&mut self, segment: &PathSegment, value: LiveValue<N>) -> bool {
        match self {
            LiveValue::Object(map) => {
                map.insert(segment.to_string(), value);
                true
            }
            LiveValue::Array(items) => {
                let index = match segment {
                    PathSegment::Index(i) => usize::try_from(*i).ok(),
                    PathSegment::Key(k) => k.parse::<usize>().ok(),
                };
                let Some(index) = index else {
                    return false;
                };
                if index >= items.len() {
                    if index - items.len() > MAX_ARRAY_GAP {
                        return false;
                    }
                    let Some(len) = index.checked_add(1) else {
                        return false;
                    };
                    items.resize_with(len, || LiveValue::Undefined);
                }
                match items.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

impl<N> From<Value> for LiveValue<N> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => LiveValue::Null,
            Value::Bool(b) => LiveValue::Bool(b),
            Value::Number(n) => LiveValue::Number(n),
            Value::String(s) => LiveValue::String(s),
            Value::Array(items) => LiveValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                LiveValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl<N> From<&str> for LiveValue<N> {
    fn from(s: &str) -> Self {
        LiveValue::String(s.to_string())
    }
}

impl<N> From<i64> for LiveValue<N> {
    fn from(n: i64) -> Self {
        LiveValue::Number(n.into())
    }
}

impl<N> From<bool> for LiveValue<N> {
    fn from(b: bool) -> Self {
        LiveValue::Bool(b)
    }
}

impl<N> FromIterator<(String, LiveValue<N>)> for LiveValue<N> {
    fn from_iter<I: IntoIterator<Item = (String, LiveValue<N>)>>(iter: I) -> Self {
        LiveValue::Object(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type V = LiveValue<()>;

    #[test]
    fn test_truthiness() {
        assert!(!V::Undefined.is_truthy());
        assert!(!V::from(json!(0)).is_truthy());
        assert!(!V::from(json!("")).is_truthy());
        assert!(V::from(json!({})).is_truthy());
        assert!(V::from(json!([])).is_truthy());
        assert!(V::Node(()).is_truthy());
    }

    #[test]
    fn test_array_accepts_numeric_keys() {
        let v = V::from(json!(["a", "b"]));
        assert_eq!(v.get(&PathSegment::from("1")), Some(&V::from("b")));
        assert_eq!(v.get(&PathSegment::from("x")), None);
    }

    #[test]
    fn test_assign_past_end_pads_with_undefined() {
        let mut v = V::from(json!([1]));
        assert!(v.assign(&PathSegment::Index(2), V::from(3i64)));
        assert_eq!(v, V::Array(vec![V::from(1i64), V::Undefined, V::from(3i64)]));
    }

    #[test]
    fn test_assign_far_past_end_is_refused() {
        let mut v = V::from(json!([1, 2]));
        assert!(!v.assign(&PathSegment::Index(4_000_000_000), V::from(9i64)));
        assert!(!v.assign(&PathSegment::Index(u64::MAX), V::from(9i64)));
        assert!(!v.assign(&PathSegment::from("18446744073709551615"), V::from(9i64)));
        assert!(!v.assign(&PathSegment::Index(2 + MAX_ARRAY_GAP as u64 + 1), V::from(9i64)));
        assert_eq!(v, V::from(json!([1, 2])));

        assert!(v.assign(&PathSegment::Index(2 + MAX_ARRAY_GAP as u64), V::from(9i64)));
        match &v {
            V::Array(items) => assert_eq!(items.len(), MAX_ARRAY_GAP + 3),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_function_label_fallbacks() {
        let f = Function {
            name: Some(String::new()),
            display_name: None,
        };
        assert_eq!(f.label(), "anonymous");
        assert_eq!(Function::named("onClick").label(), "onClick");
    }
}
