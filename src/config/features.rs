//! Feature flags (opt-in: default disabled)

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    /// Feed a scripted host session instead of waiting for a real host
    pub demo: bool,

    /// Also put copied marker settings on the OS clipboard as JSON
    pub system_clipboard: bool,
}

/// Feature flags as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeatures {
    pub demo: Option<bool>,
    pub system_clipboard: Option<bool>,
}

impl Features {
    pub fn from_file(file: Option<FileFeatures>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            demo: file.demo.unwrap_or(false),
            system_clipboard: file.system_clipboard.unwrap_or(false),
        }
    }
}
