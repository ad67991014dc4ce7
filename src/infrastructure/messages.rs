//! Harness wire messages (one JSON object per line)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::dto::{
    ActionMap, AspectPermissions, HostOperation, ModuleConfig, ResultPayload, SessionSnapshot,
};
use crate::domain::aggregates::SessionEvent;
use crate::domain::value_objects::{ClueId, ObjectId};
use crate::infrastructure::runtime::RuntimeEvent;

/// Messages from the host (or the presentation layer) to the module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Handshake: action map and aspect permissions
    Init {
        actions: ActionMap,
        #[serde(default)]
        aspects: AspectPermissions,
    },
    Configure { config: ModuleConfig },
    ClickObject { object_id: ObjectId },
    RequestHint,
    SelectClue { clue_id: ClueId },
    Pause,
    Resume,
    GiveUp,
    Operation { operation: HostOperation },
    AspectUpdate { key: String, value: Value },
    /// Presentation asks the module to write an aspect
    RequestAspectChange { key: String, value: Value },
    RequestSnapshot,
    Shutdown,
}

/// Messages from the module to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModuleMessage {
    Ready,
    Result { payload: ResultPayload },
    AspectChange { key: String, value: Value },
    Snapshot { snapshot: Box<SessionSnapshot> },
    Error { code: String, message: String },
}

impl From<HostMessage> for RuntimeEvent {
    fn from(message: HostMessage) -> Self {
        match message {
            HostMessage::Init { actions, aspects } => Self::Init { actions, aspects },
            HostMessage::Configure { config } => Self::Configure(Box::new(config)),
            HostMessage::ClickObject { object_id } => {
                Self::Session(SessionEvent::ObjectClicked(object_id))
            }
            HostMessage::RequestHint => Self::Session(SessionEvent::HintRequested),
            HostMessage::SelectClue { clue_id } => Self::Session(SessionEvent::ClueSelected(clue_id)),
            HostMessage::Pause => Self::Session(SessionEvent::Paused),
            HostMessage::Resume => Self::Session(SessionEvent::Resumed),
            HostMessage::GiveUp => Self::Session(SessionEvent::GaveUp),
            HostMessage::Operation { operation } => Self::Operation(operation),
            HostMessage::AspectUpdate { key, value } => Self::AspectUpdate { key, value },
            HostMessage::RequestAspectChange { key, value } => {
                Self::AspectChangeRequested { key, value }
            }
            HostMessage::RequestSnapshot => Self::SnapshotRequested,
            HostMessage::Shutdown => Self::Shutdown,
        }
    }
}
