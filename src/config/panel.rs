//! Panel behaviour and export location

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Panel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Quiet period before a search keystroke filters the table
    pub search_debounce_ms: u64,

    /// Refuse to send `createBlip` for drafts that fail validation
    pub validate_before_submit: bool,

    /// Submit `hideUi: false` as `null`, the way existing host resources
    /// expect. Off submits every flag as its actual value.
    pub host_compatible_flags: bool,

    /// Host calls that may queue before new ones are dropped
    pub host_call_buffer: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            validate_before_submit: true,
            host_compatible_flags: true,
            host_call_buffer: 256,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FilePanel {
    pub search_debounce_ms: Option<u64>,
    pub validate_before_submit: Option<bool>,
    pub host_compatible_flags: Option<bool>,
    pub host_call_buffer: Option<usize>,
}

impl PanelConfig {
    pub fn from_file(file: Option<FilePanel>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            search_debounce_ms: file.search_debounce_ms.unwrap_or(defaults.search_debounce_ms),
            validate_before_submit: file
                .validate_before_submit
                .unwrap_or(defaults.validate_before_submit),
            host_compatible_flags: file
                .host_compatible_flags
                .unwrap_or(defaults.host_compatible_flags),
            host_call_buffer: file
                .host_call_buffer
                .filter(|n| *n > 0)
                .unwrap_or(defaults.host_call_buffer),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Where `exportData` payloads are saved
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./exports"),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileExport {
    pub dir: Option<String>,
}

impl ExportConfig {
    pub fn from_file(file: Option<FileExport>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            dir: file.dir.map(PathBuf::from).unwrap_or_else(|| Self::default().dir),
        }
    }
}
