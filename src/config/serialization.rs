//! Config serialization to TOML
//!
//! Single source of truth for the config file format: `ensure_config_exists`
//! writes this template on first run and `blipdesk config --reset` rewrites it.

use super::Config;
use std::path::Path;

/// Quote a string for TOML (escapes backslashes in Windows paths)
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

fn quoted_path(path: &Path) -> String {
    quoted(&path.to_string_lossy())
}

impl Config {
    pub fn to_toml(&self) -> String {
        format!(
            r#"# blipdesk configuration
#
# Environment variables override this file:
#   BLIPDESK_SEARCH_DEBOUNCE_MS, BLIPDESK_EXPORT_DIR, BLIPDESK_DEMO, RUST_LOG

# Control panel behaviour
[panel]
# Quiet period (ms) before a search keystroke filters the table
search_debounce_ms = {debounce}
# Refuse to submit drafts that fail validation (name, ranges)
validate_before_submit = {validate}
# Submit hideUi=false as null, as existing host resources expect
host_compatible_flags = {compat}
# Host calls that may queue before new ones are dropped
host_call_buffer = {buffer}

# Where exported blip files are written
[export]
dir = {export_dir}

# Feature flags
[features]
# Replay a scripted host session instead of reading a real host
demo = {demo}
# Mirror copied blip settings to the OS clipboard
system_clipboard = {clipboard}

# Logging configuration (RUST_LOG env var overrides level)
[logging]
level = {log_level}
# JSON log file (console output always goes to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            debounce = self.panel.search_debounce_ms,
            validate = self.panel.validate_before_submit,
            compat = self.panel.host_compatible_flags,
            buffer = self.panel.host_call_buffer,
            export_dir = quoted_path(&self.export.dir),
            demo = self.features.demo,
            clipboard = self.features.system_clipboard,
            log_level = quoted(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quoted_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quoted(&self.logging.file_prefix),
        )
    }
}
