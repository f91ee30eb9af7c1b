//! Clipboard integration
//!
//! The console analogs of the web client's copy/paste affordances: pull
//! text to synthesize from the system clipboard, push generated text back.

use crate::{Result, TtscError};
use arboard::Clipboard;
use log::debug;

/// Copy text to system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    debug!("Copying {} chars to clipboard", text.len());

    let mut clipboard = Clipboard::new()
        .map_err(|e| TtscError::Other(format!("Failed to open clipboard: {}", e)))?;

    clipboard
        .set_text(text)
        .map_err(|e| TtscError::Other(format!("Failed to copy to clipboard: {}", e)))?;

    Ok(())
}

/// Get text from system clipboard
pub fn get_from_clipboard() -> Result<String> {
    debug!("Getting text from clipboard");

    let mut clipboard = Clipboard::new()
        .map_err(|e| TtscError::Other(format!("Failed to open clipboard: {}", e)))?;

    clipboard
        .get_text()
        .map_err(|e| TtscError::Other(format!("Failed to get from clipboard: {}", e)))
}
