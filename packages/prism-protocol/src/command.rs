use crate::message::{Message, names};
use crate::{Id, Path, UpdateType};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRequest {
    pub id: Id,
    #[serde(default)]
    pub children: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: UpdateType,
    pub path: Path,
    #[serde(default)]
    pub value: Value,
}

/// Commands the inspector panel sends to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Inspect(Id),
    Log(LogRequest),
    /// Reserved. Accepted and ignored by the page.
    Select(Id),
    Highlight(Option<Id>),
    StartPickElement,
    StopPickElement,
    Update(UpdateRequest),
    Copy(Value),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("invalid payload for `{name}`: {source}")]
    InvalidPayload {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Command {
    pub fn decode(message: &Message) -> Result<Self, CommandError> {
        let name = message.name.as_str();
        let payload = || message.payload.clone();
        let invalid = |source| CommandError::InvalidPayload {
            name: name.to_string(),
            source,
        };

        let cmd = match name {
            names::INSPECT => Command::Inspect(serde_json::from_value(payload()).map_err(invalid)?),
            names::LOG => Command::Log(serde_json::from_value(payload()).map_err(invalid)?),
            names::SELECT => Command::Select(serde_json::from_value(payload()).map_err(invalid)?),
            names::HIGHLIGHT => {
                Command::Highlight(serde_json::from_value(payload()).map_err(invalid)?)
            }
            names::START_PICK_ELEMENT => Command::StartPickElement,
            names::STOP_PICK_ELEMENT => Command::StopPickElement,
            names::UPDATE => Command::Update(serde_json::from_value(payload()).map_err(invalid)?),
            names::COPY => Command::Copy(payload()),
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Inspect(_) => names::INSPECT,
            Command::Log(_) => names::LOG,
            Command::Select(_) => names::SELECT,
            Command::Highlight(_) => names::HIGHLIGHT,
            Command::StartPickElement => names::START_PICK_ELEMENT,
            Command::StopPickElement => names::STOP_PICK_ELEMENT,
            Command::Update(_) => names::UPDATE,
            Command::Copy(_) => names::COPY,
        }
    }

    pub fn encode(&self) -> Message {
        let payload = match self {
            Command::Inspect(id) | Command::Select(id) => json!(id),
            Command::Log(req) => json!(req),
            Command::Highlight(id) => json!(id),
            Command::StartPickElement | Command::StopPickElement => Value::Null,
            Command::Update(req) => json!(req),
            Command::Copy(value) => value.clone(),
        };
        Message::new(self.name(), payload)
    }
}
