// Events that flow between the host resource and the panel
//
// The host pushes `{ "action": ..., "data": ... }` envelopes into the UI and
// receives fire-and-forget calls back. Inbound envelopes are turned into a
// `HostEvent` here; payloads that need shape inspection (`updateBlipData`)
// stay as raw JSON until the reconciler looks at them.

use crate::blips::model::as_integer;
use crate::blips::SubmissionPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw host -> UI envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuiMessage {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

impl NuiMessage {
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Self {
            action: action.into(),
            data,
        }
    }
}

/// Host -> UI event the panel understands
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Show the panel; with an id, open that marker's settings
    SetVisible(Option<i64>),
    /// Delete, upsert or snapshot; shape decided by the reconciler
    UpdateBlipData(Value),
    /// Serialized collection for the file-save collaborator
    ExportData(String),
    /// Informational; the data itself follows as `UpdateBlipData`
    ImportResult { imported: u64, failed: u64 },
}

impl HostEvent {
    /// Interpret an envelope. Unknown actions yield `None`.
    pub fn from_message(message: NuiMessage) -> Option<Self> {
        let NuiMessage { action, data } = message;
        match action.as_str() {
            "setVisible" => {
                let id = match &data {
                    Value::Null => None,
                    other => {
                        let id = as_integer(other);
                        if id.is_none() {
                            tracing::warn!("setVisible with non-integer id {}, showing list", other);
                        }
                        id
                    }
                };
                Some(Self::SetVisible(id))
            }
            "updateBlipData" => Some(Self::UpdateBlipData(data)),
            "exportData" => {
                // Opaque: pass strings through untouched, re-encode anything else
                let text = match data {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some(Self::ExportData(text))
            }
            "importResult" => {
                let count = |key: &str| data.get(key).and_then(Value::as_u64).unwrap_or(0);
                Some(Self::ImportResult {
                    imported: count("imported"),
                    failed: count("failed"),
                })
            }
            other => {
                tracing::debug!("Ignoring unknown host action {:?}", other);
                None
            }
        }
    }
}

/// UI -> host call; serialized as `{"call": "<name>", "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", content = "data")]
pub enum HostCall {
    #[serde(rename = "createBlip")]
    CreateBlip(SubmissionPayload),
    #[serde(rename = "deleteblip")]
    DeleteBlip(i64),
    #[serde(rename = "teleportToBlip")]
    TeleportToBlip(i64),
    #[serde(rename = "exportBlips")]
    ExportBlips,
    #[serde(rename = "importBlips")]
    ImportBlips(String),
    #[serde(rename = "notify")]
    Notify(String),
    #[serde(rename = "exit")]
    Exit,
}

impl HostCall {
    /// Host-side callback name
    pub fn name(&self) -> &'static str {
        match self {
            HostCall::CreateBlip(_) => "createBlip",
            HostCall::DeleteBlip(_) => "deleteblip",
            HostCall::TeleportToBlip(_) => "teleportToBlip",
            HostCall::ExportBlips => "exportBlips",
            HostCall::ImportBlips(_) => "importBlips",
            HostCall::Notify(_) => "notify",
            HostCall::Exit => "exit",
        }
    }
}
