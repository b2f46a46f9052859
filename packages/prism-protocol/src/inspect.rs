use crate::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node categories as the panel knows them. Encoded as small integers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ElementKind {
    HtmlElement = 1,
    ClassComponent = 2,
    FunctionComponent = 3,
    ForwardRef = 4,
    Memo = 5,
    Suspense = 6,
}

impl From<ElementKind> for u8 {
    fn from(kind: ElementKind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for ElementKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ElementKind::HtmlElement),
            2 => Ok(ElementKind::ClassComponent),
            3 => Ok(ElementKind::FunctionComponent),
            4 => Ok(ElementKind::ForwardRef),
            5 => Ok(ElementKind::Memo),
            6 => Ok(ElementKind::Suspense),
            other => Err(format!("unknown element kind {}", other)),
        }
    }
}

/// Snapshot of one node's editable data, built fresh for every `inspect`.
///
/// `props`, `context` and `hooks` are `None` rather than empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectData {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub context: Option<Map<String, Value>>,
    pub can_edit_hooks: bool,
    pub hooks: Option<Value>,
    pub can_edit_props: bool,
    pub props: Option<Map<String, Value>>,
    pub can_edit_state: bool,
    pub state: Option<Map<String, Value>>,
}

/// Stand-in for a live tree node inside serialized data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "vnode")]
pub struct SerializedVNode {
    pub name: String,
}

impl SerializedVNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "type": "vnode", "name": self.name })
    }
}
