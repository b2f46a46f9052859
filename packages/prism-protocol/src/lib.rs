pub mod command;
pub mod inspect;
pub mod message;

pub use command::{Command, CommandError, LogRequest, UpdateRequest};
pub use inspect::{ElementKind, InspectData, SerializedVNode};
pub use message::{Message, RuntimeMessage, events, names};

use serde::{Deserialize, Serialize};

/// Opaque handle for a tree node, issued by the renderer of the inspected page.
pub type Id = u64;

/// Browser tab a connection pair belongs to.
pub type TabId = i64;

/// Which category of a node's live data an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Props,
    State,
    Hooks,
    Context,
}

/// One step of a deep property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u64),
    Key(String),
}

impl PathSegment {
    /// `0` and `""` are falsy in the panel's path model and never address a slot.
    pub fn is_truthy(&self) -> bool {
        match self {
            PathSegment::Index(i) => *i != 0,
            PathSegment::Key(k) => !k.is_empty(),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<u64> for PathSegment {
    fn from(index: u64) -> Self {
        PathSegment::Index(index)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => write!(f, "{}", k),
        }
    }
}

pub type Path = Vec<PathSegment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_decode_from_mixed_json() {
        let path: Path = serde_json::from_str(r#"["items", 2, "label"]"#).unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::from("items"),
                PathSegment::Index(2),
                PathSegment::from("label")
            ]
        );
    }

    #[test]
    fn test_falsy_segments() {
        assert!(!PathSegment::Index(0).is_truthy());
        assert!(!PathSegment::from("").is_truthy());
        assert!(PathSegment::from("a").is_truthy());
    }

    #[test]
    fn test_update_type_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&UpdateType::Hooks).unwrap(), "\"hooks\"");
    }
}
