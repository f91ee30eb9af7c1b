//! Text buffer with optional selection
//!
//! Synthesis speaks the trimmed selection when one is set and non-empty,
//! otherwise the full text. Selection offsets are character positions.

use log::debug;

/// The text the user wants synthesized
#[derive(Debug, Default)]
pub struct TextBuffer {
    content: String,
    /// Half-open character range within `content`
    selection: Option<(usize, usize)>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Replace the text, dropping any selection
    pub fn set(&mut self, content: &str) {
        self.content = content.to_string();
        self.selection = None;
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.selection = None;
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Select a character range; out-of-order or out-of-range offsets are
    /// rejected
    pub fn select(&mut self, start: usize, end: usize) -> bool {
        if start < end && end <= self.char_count() {
            debug!("Selection set to {}..{}", start, end);
            self.selection = Some((start, end));
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text of the selection, when one is set
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection?;
        Some(self.content.chars().skip(start).take(end - start).collect())
    }

    /// What synthesis should speak: the trimmed selection when non-empty,
    /// else the trimmed full text; `None` when that leaves nothing
    pub fn effective_text(&self) -> Option<String> {
        if let Some(selected) = self.selected_text() {
            let trimmed = selected.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
