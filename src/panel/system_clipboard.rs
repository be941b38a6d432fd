//! Mirror copied marker settings to the OS clipboard
//!
//! Optional (`features.system_clipboard`). The clipboard handle is opened
//! per copy so nothing is held while the panel idles; on headless hosts
//! opening it fails and the panel carries on with its in-memory relay.

use crate::blips::DraftRecord;
use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_settings(draft: &DraftRecord) -> Result<()> {
    let text = serde_json::to_string_pretty(draft).context("Failed to encode settings")?;
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}
