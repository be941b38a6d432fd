//! Configuration for the control panel
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/blipdesk/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod features;
mod observability;
mod panel;
mod serialization;


pub use features::{Features, FileFeatures};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use panel::{ExportConfig, FileExport, FilePanel, PanelConfig};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub panel: PanelConfig,
    pub export: ExportConfig,
    pub features: Features,
    pub logging: LoggingConfig,
}

/// Config file structure (all fields optional)
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub panel: Option<FilePanel>,
    pub export: Option<FileExport>,
    pub features: Option<FileFeatures>,
    pub logging: Option<FileLogging>,
}

fn truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Config {
    /// Get the config file path: ~/.config/blipdesk/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("blipdesk").join("config.toml"))
    }

    /// Write the default template if no config file exists yet.
    /// Returns the path when a file was created.
    pub fn ensure_config_exists() -> Result<Option<PathBuf>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };
        if path.exists() {
            return Ok(None);
        }
        Self::write_default(&path)?;
        Ok(Some(path))
    }

    /// Overwrite `path` with the default template
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default().to_toml())
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Read and parse a config file. A missing file is not an error; a file
    /// that exists but does not parse is.
    pub fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file: {}", path.display()))
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut panel = PanelConfig::from_file(file.panel);
        let mut export = ExportConfig::from_file(file.export);
        let mut features = Features::from_file(file.features);
        let logging = LoggingConfig::from_file(file.logging);

        // Debounce: env > file > default
        if let Some(ms) = env("BLIPDESK_SEARCH_DEBOUNCE_MS").and_then(|v| v.trim().parse().ok()) {
            panel.search_debounce_ms = ms;
        }

        // Export directory: env > file > default
        if let Some(dir) = env("BLIPDESK_EXPORT_DIR").filter(|v| !v.is_empty()) {
            export.dir = PathBuf::from(dir);
        }

        // Demo mode: env can switch it on, never off
        if env("BLIPDESK_DEMO").is_some_and(|v| truthy(&v)) {
            features.demo = true;
        }

        Self {
            panel,
            export,
            features,
            logging,
        }
    }
}
