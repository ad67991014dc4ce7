//! Operations pushed by the host at runtime

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SET_TITLE: &str = "set-title";

/// Raw operation as it arrives from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostOperation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl HostOperation {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Operations the module understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOperation {
    SetTitle(String),
    Unknown(String),
}

impl From<&HostOperation> for ModuleOperation {
    fn from(operation: &HostOperation) -> Self {
        let title = operation.payload.get("title").and_then(Value::as_str);
        match (operation.kind.as_str(), title) {
            (SET_TITLE, Some(title)) => Self::SetTitle(title.to_string()),
            _ => Self::Unknown(operation.kind.clone()),
        }
    }
}
