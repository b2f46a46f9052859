use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Envelope carried over every port. The relay forwards it without looking inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Sent by the relay to the page side once forwarding is wired.
    pub fn initialized() -> Self {
        Self::new(names::INITIALIZED, json!({ "ready": true }))
    }

    pub fn to_value(&self) -> Value {
        json!({ "name": self.name, "payload": self.payload })
    }
}

/// Announcement a page sends once per load, outside of any port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMessage {
    #[serde(rename = "hasPreact", default)]
    pub has_preact: bool,
}

/// Inbound command names (panel -> page).
pub mod names {
    pub const INITIALIZED: &str = "initialized";
    pub const INSPECT: &str = "inspect";
    pub const LOG: &str = "log";
    pub const SELECT: &str = "select";
    pub const HIGHLIGHT: &str = "highlight";
    pub const START_PICK_ELEMENT: &str = "startPickElement";
    pub const STOP_PICK_ELEMENT: &str = "stopPickElement";
    pub const UPDATE: &str = "update";
    pub const COPY: &str = "copy";
}

/// Outbound event names (page -> panel).
pub mod events {
    pub const SELECT_NODE: &str = "select-node";
    pub const STOP_PICKER: &str = "stop-picker";
    pub const INSPECT_RESULT: &str = "inspect-result";
    pub const OPERATION: &str = "operation";
    pub const UNMOUNT: &str = "unmount";
}
