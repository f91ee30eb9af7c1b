//! Terminal rendering helpers
//!
//! The terminal sits in raw mode while the client runs, so every line goes
//! out through `emit` with an explicit carriage return.

use crate::api::types::SavedFileRecord;
use crate::history::HistoryEntry;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Width used when truncating free text for list display
pub const TEXT_PREVIEW_WIDTH: usize = 60;

/// Print one line, raw-mode safe
pub fn emit(line: &str) {
    let mut stdout = io::stdout();
    let _ = write!(stdout, "{}\r\n", line);
    let _ = stdout.flush();
}

/// Truncate a string to a display width, appending an ellipsis when cut
pub fn truncate_display(text: &str, max_width: usize) -> String {
    let mut width = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            out.push_str("...");
            return out;
        }
        width += w;
        out.push(ch);
    }
    out
}

/// One history entry as a list row
pub fn history_row(index: usize, entry: &HistoryEntry) -> String {
    let preview = truncate_display(&entry.text.replace('\n', " "), TEXT_PREVIEW_WIDTH);
    let clip = if entry.clip_available() { "" } else { " [audio expired]" };
    format!("{:>2}. {} — {}{}", index + 1, entry.voice_label, preview, clip)
}

/// One saved-file record as a list row
pub fn saved_row(index: usize, record: &SavedFileRecord) -> String {
    let tags = if record.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.tags.join(", "))
    };
    let url = record.download_url().unwrap_or("no download url");
    format!(
        "{:>2}. {}{} — {}",
        index + 1,
        truncate_display(&record.title, TEXT_PREVIEW_WIDTH),
        tags,
        url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_display_short_text_unchanged() {
        assert_eq!(truncate_display("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_display_cuts_at_width() {
        let out = truncate_display("hello world", 5);
        assert_eq!(out, "hello...");
    }

    #[test]
    fn test_truncate_display_wide_chars() {
        // CJK characters are two columns wide
        let out = truncate_display("你好世界", 4);
        assert_eq!(out, "你好...");
    }

    #[test]
    fn test_history_row_flattens_newlines() {
        let entry = HistoryEntry::new("line one\nline two", "Aria (F)", "en-US-AriaNeural", None);
        let row = history_row(0, &entry);
        assert!(!row.contains('\n'));
        assert!(row.contains("Aria (F)"));
        assert!(row.contains("[audio expired]"));
    }
}
