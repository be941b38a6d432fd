// Panel state owner
//
// Holds everything the control panel shows: the mirrored collection, the
// table state (sort, page, search), the draft being edited, the clipboard,
// and which view is up. Host events and operator actions are the only two
// ways in; host calls are the only way out.
//
// The collection is never edited locally. Submitting, deleting and
// importing only ask the host, which answers with `updateBlipData`.

mod actions;
mod host;
mod system_clipboard;


pub use actions::OperatorAction;
pub use host::HostBridge;

use crate::blips::{
    derive, to_draft, ActiveDraft, BlipCollection, BlipView, ClipboardRelay, DraftRecord,
    FlagPolicy, SearchDebouncer, SortState, ViewQuery,
};
use crate::config::Config;
use crate::events::{HostCall, HostEvent};
use crate::export::{read_import, ExportWriter};
use crate::validation::{validate_draft, ValidationError};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// Which of the two views is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    List,
    Settings,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::List => "Blips",
            Route::Settings => "Settings",
        }
    }
}

/// Behaviour switches, resolved from `Config`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSettings {
    pub search_debounce: Duration,
    pub validate_before_submit: bool,
    pub flag_policy: FlagPolicy,
    pub mirror_to_system_clipboard: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            search_debounce: crate::blips::search::DEFAULT_SEARCH_DEBOUNCE,
            validate_before_submit: true,
            flag_policy: FlagPolicy::HOST_COMPATIBLE,
            mirror_to_system_clipboard: false,
        }
    }
}

impl PanelSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            search_debounce: Duration::from_millis(config.panel.search_debounce_ms),
            validate_before_submit: config.panel.validate_before_submit,
            flag_policy: if config.panel.host_compatible_flags {
                FlagPolicy::HOST_COMPATIBLE
            } else {
                FlagPolicy::UNIFORM
            },
            mirror_to_system_clipboard: config.features.system_clipboard,
        }
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// `createBlip` went to the host (or was dropped by a full buffer)
    Sent,
    /// Validation failed; nothing was sent and the panel stays open
    Rejected(Vec<ValidationError>),
}

/// Everything a presentation layer needs to draw the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub visible: bool,
    pub route: Route,
    /// Text in the search box, which may not be applied yet
    pub search: String,
    pub sort: SortState,
    pub view: BlipView,
    pub draft: DraftRecord,
    pub clipboard_ready: bool,
}

pub struct Panel {
    collection: BlipCollection,
    sort: SortState,
    /// Requested page; clamped whenever the row count can change
    page_index: usize,
    search: SearchDebouncer,
    draft: ActiveDraft,
    clipboard: ClipboardRelay,
    route: Route,
    visible: bool,
    host: HostBridge,
    exports: ExportWriter,
    settings: PanelSettings,
}

impl Panel {
    pub fn new(settings: PanelSettings, host: HostBridge, exports: ExportWriter) -> Self {
        Self {
            collection: BlipCollection::new(),
            sort: SortState::unsorted(),
            page_index: 0,
            search: SearchDebouncer::new(settings.search_debounce),
            draft: ActiveDraft::new_blank(),
            clipboard: ClipboardRelay::new(),
            route: Route::default(),
            visible: false,
            host,
            exports,
            settings,
        }
    }

    pub fn collection(&self) -> &BlipCollection {
        &self.collection
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draft(&self) -> &DraftRecord {
        self.draft.draft()
    }

    pub fn clipboard(&self) -> &ClipboardRelay {
        &self.clipboard
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    fn query(&self) -> ViewQuery {
        ViewQuery {
            search_text: self.search.effective().to_string(),
            sort: self.sort,
            page_index: self.page_index,
        }
    }

    /// Current table page
    pub fn view(&self) -> BlipView {
        derive(&self.collection, &self.query())
    }

    fn clamp_page(&mut self) {
        self.page_index = self.view().page_index;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.route = Route::List;
    }

    fn notify(&self, message: impl Into<String>) {
        self.host.send(HostCall::Notify(message.into()));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Host -> panel
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::SetVisible(None) => {
                self.visible = true;
                self.route = Route::List;
            }
            HostEvent::SetVisible(Some(id)) => {
                self.visible = true;
                match self.collection.get(id) {
                    Some(record) => {
                        self.draft = ActiveDraft::open(record);
                        self.route = Route::Settings;
                    }
                    None => {
                        tracing::warn!(
                            "setVisible for unknown blip {}, staying on {}",
                            id,
                            self.route.name()
                        );
                    }
                }
            }
            HostEvent::UpdateBlipData(payload) => {
                self.collection.apply_payload(&payload);
                self.clamp_page();
            }
            HostEvent::ExportData(data) => {
                if let Err(e) = self.exports.save(&data) {
                    tracing::error!("Export failed: {:#}", e);
                }
            }
            HostEvent::ImportResult { imported, failed } => {
                tracing::info!(
                    "Host import finished: {} imported, {} failed",
                    imported,
                    failed
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operator -> panel
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_action(&mut self, action: OperatorAction) {
        self.handle_action_at(action, Instant::now());
    }

    /// Same as `handle_action` with an explicit clock for the search debounce
    pub fn handle_action_at(&mut self, action: OperatorAction, now: Instant) {
        tracing::debug!("Operator action: {}", action.name());
        match action {
            OperatorAction::Search { text } => self.search.input(text, now),
            OperatorAction::Sort { column } => self.sort.toggle(column),
            OperatorAction::Page { index } => {
                self.page_index = index;
                self.clamp_page();
            }
            OperatorAction::NextPage => {
                self.page_index = self.page_index.saturating_add(1);
                self.clamp_page();
            }
            OperatorAction::PrevPage => {
                self.page_index = self.page_index.saturating_sub(1);
                self.clamp_page();
            }
            OperatorAction::NewBlip => {
                self.draft = ActiveDraft::new_blank();
                self.route = Route::Settings;
            }
            OperatorAction::Open { id } => match self.collection.get(id) {
                Some(record) => {
                    self.draft = ActiveDraft::open(record);
                    self.route = Route::Settings;
                }
                None => tracing::warn!("Cannot open unknown blip {}", id),
            },
            OperatorAction::CopyRow { id } => match self.collection.get(id) {
                Some(record) => {
                    let copied = to_draft(record);
                    self.copy(copied);
                }
                None => tracing::warn!("Cannot copy unknown blip {}", id),
            },
            OperatorAction::Delete { id } => {
                self.host.send(HostCall::DeleteBlip(id));
            }
            OperatorAction::Teleport { id } => {
                self.hide();
                self.host.send(HostCall::TeleportToBlip(id));
            }
            OperatorAction::Export => {
                self.host.send(HostCall::ExportBlips);
            }
            OperatorAction::Import { path } => self.import_from(&path),
            OperatorAction::Close => {
                self.hide();
                self.host.send(HostCall::Exit);
            }
            OperatorAction::Set { edit } => self.draft.apply(edit),
            OperatorAction::ToggleFlag { flag } => self.draft.toggle_flag(flag),
            OperatorAction::AddGroup => self.draft.add_group_row(),
            OperatorAction::SetGroupName { index, name } => {
                if !self.draft.set_group_name(index, name) {
                    tracing::warn!("No group row at index {}", index);
                }
            }
            OperatorAction::SetGroupGrade { index, grade } => {
                if !self.draft.set_group_grade(index, grade) {
                    tracing::warn!("No group row at index {}", index);
                }
            }
            OperatorAction::RemoveGroup { index } => {
                if !self.draft.remove_group_row(index) {
                    tracing::warn!("No group row at index {}", index);
                }
            }
            OperatorAction::CopyActive => {
                let copied = self.draft.draft().clone();
                self.copy(copied);
            }
            OperatorAction::Paste => {
                if self.clipboard.apply(self.draft.draft_mut()) {
                    self.notify("Settings applied");
                } else {
                    tracing::debug!("Paste with empty clipboard ignored");
                }
            }
            OperatorAction::Submit => {
                self.submit();
            }
            OperatorAction::Back => self.route = Route::List,
        }
    }

    fn copy(&mut self, draft: DraftRecord) {
        self.clipboard.set(draft);
        if self.settings.mirror_to_system_clipboard {
            if let Some(entry) = self.clipboard.entry() {
                if let Err(e) = system_clipboard::copy_settings(entry) {
                    tracing::warn!("System clipboard unavailable: {:#}", e);
                }
            }
        }
        self.notify("Settings copied");
    }

    fn import_from(&self, path: &Path) {
        match read_import(path) {
            Ok(contents) if contents.trim().is_empty() => {
                tracing::warn!("Import file {} is empty, nothing sent", path.display());
            }
            Ok(contents) => {
                tracing::info!("Importing blips from {}", path.display());
                self.host.send(HostCall::ImportBlips(contents));
            }
            Err(e) => tracing::error!("Import failed: {:#}", e),
        }
    }

    /// Validate (when enabled), then hand the draft to the host and hide.
    /// The draft itself is kept as it was.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.settings.validate_before_submit {
            let errors = validate_draft(self.draft.draft());
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                tracing::info!("Submit rejected: {}", message);
                self.notify(message);
                return SubmitOutcome::Rejected(errors);
            }
        }

        let payload = self.draft.submission(self.settings.flag_policy);
        self.hide();
        self.host.send(HostCall::CreateBlip(payload));
        SubmitOutcome::Sent
    }

    // ─────────────────────────────────────────────────────────────────────
    // Debounce
    // ─────────────────────────────────────────────────────────────────────

    /// When the runtime should next call `poll_search`
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Apply the pending search once its window has elapsed.
    /// Returns true when the applied text changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        if self.search.fire(now) {
            self.clamp_page();
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            visible: self.visible,
            route: self.route,
            search: self.search.pending().to_string(),
            sort: self.sort,
            view: self.view(),
            draft: self.draft.draft().clone(),
            clipboard_ready: !self.clipboard.is_empty(),
        }
    }
}
