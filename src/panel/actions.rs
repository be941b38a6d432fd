// Operator actions - everything a person at the panel can do
//
// Serialized as `{"op": "<name>", ...fields}` so an external front end (or
// the stdin bridge) can drive the panel with plain JSON lines.

use crate::blips::{DraftEdit, FlagField, SortColumn};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OperatorAction {
    // ── list view ────────────────────────────────────────────────
    /// Keystroke in the search box; applied after the debounce window
    Search { text: String },
    Sort { column: SortColumn },
    Page { index: usize },
    NextPage,
    PrevPage,
    /// Start a blank marker and open the settings view
    NewBlip,
    /// Open settings for an existing marker
    Open { id: i64 },
    CopyRow { id: i64 },
    Delete { id: i64 },
    Teleport { id: i64 },
    Export,
    Import { path: PathBuf },
    Close,

    // ── settings view ────────────────────────────────────────────
    Set { edit: DraftEdit },
    ToggleFlag { flag: FlagField },
    AddGroup,
    SetGroupName { index: usize, name: Option<String> },
    SetGroupGrade { index: usize, grade: Option<i64> },
    RemoveGroup { index: usize },
    CopyActive,
    Paste,
    Submit,
    /// Settings -> list without submitting
    Back,
}

impl OperatorAction {
    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            OperatorAction::Search { .. } => "search",
            OperatorAction::Sort { .. } => "sort",
            OperatorAction::Page { .. } => "page",
            OperatorAction::NextPage => "nextPage",
            OperatorAction::PrevPage => "prevPage",
            OperatorAction::NewBlip => "newBlip",
            OperatorAction::Open { .. } => "open",
            OperatorAction::CopyRow { .. } => "copyRow",
            OperatorAction::Delete { .. } => "delete",
            OperatorAction::Teleport { .. } => "teleport",
            OperatorAction::Export => "export",
            OperatorAction::Import { .. } => "import",
            OperatorAction::Close => "close",
            OperatorAction::Set { .. } => "set",
            OperatorAction::ToggleFlag { .. } => "toggleFlag",
            OperatorAction::AddGroup => "addGroup",
            OperatorAction::SetGroupName { .. } => "setGroupName",
            OperatorAction::SetGroupGrade { .. } => "setGroupGrade",
            OperatorAction::RemoveGroup { .. } => "removeGroup",
            OperatorAction::CopyActive => "copyActive",
            OperatorAction::Paste => "paste",
            OperatorAction::Submit => "submit",
            OperatorAction::Back => "back",
        }
    }
}
