//! Session history
//!
//! A bounded, newest-first list of past synthesis results, persisted to the
//! data directory as a convenience cache. Clip paths in reloaded entries
//! point at swept files and are treated as expired.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of entries kept
pub const HISTORY_LIMIT: usize = 20;

/// One past synthesis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub voice_label: String,
    pub voice_value: String,
    /// Unix timestamp, seconds
    pub created_at: u64,
    /// Locally-scoped audio handle; does not survive a restart
    pub clip_path: Option<PathBuf>,
}

impl HistoryEntry {
    pub fn new(text: &str, voice_label: &str, voice_value: &str, clip_path: Option<PathBuf>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            text: text.to_string(),
            voice_label: voice_label.to_string(),
            voice_value: voice_value.to_string(),
            created_at,
            clip_path,
        }
    }

    /// Is the referenced clip still on disk?
    pub fn clip_available(&self) -> bool {
        self.clip_path.as_deref().is_some_and(Path::exists)
    }

    /// Title used when the entry is uploaded: leading slice of the text
    pub fn upload_title(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.len() > 60 {
            let head: String = chars[..60].iter().collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}

/// Capped, most-recent-first session history
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    path: PathBuf,
}

impl SessionHistory {
    /// Load history from disk; a missing or corrupt file yields an empty
    /// history
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(HISTORY_LIMIT);
                    entries
                }
                Err(e) => {
                    warn!("Discarding unreadable history at {:?}: {}", path, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        debug!("Loaded {} history entries", entries.len());
        Self { entries, path }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend an entry, enforcing the cap
    ///
    /// Returns the entries that fell off the end so their clips can be
    /// released.
    pub fn push(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        self.entries.insert(0, entry);
        let evicted = self.entries.split_off(HISTORY_LIMIT.min(self.entries.len()));
        self.save();
        evicted
    }

    /// Drop all entries, returning them for clip release
    pub fn clear(&mut self) -> Vec<HistoryEntry> {
        let drained = std::mem::take(&mut self.entries);
        self.save();
        drained
    }

    /// Persist to disk, best-effort
    fn save(&self) {
        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!("Failed to save history to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(&format!("text {}", n), "Aria (F)", "en-US-AriaNeural", None)
    }

    #[test]
    fn test_newest_first_and_capped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = SessionHistory::load(tmp.path().join("history.json"));

        for n in 0..25 {
            history.push(entry(n));
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.entries()[0].text, "text 24");
        assert_eq!(history.entries()[HISTORY_LIMIT - 1].text, "text 5");
    }

    #[test]
    fn test_push_reports_evicted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = SessionHistory::load(tmp.path().join("history.json"));

        for n in 0..HISTORY_LIMIT {
            assert!(history.push(entry(n)).is_empty());
        }
        let evicted = history.push(entry(99));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].text, "text 0");
    }

    #[test]
    fn test_upload_title_truncation() {
        let long = "x".repeat(80);
        let e = HistoryEntry::new(&long, "v", "v", None);
        assert_eq!(e.upload_title().chars().count(), 63);
        assert!(e.upload_title().ends_with("..."));

        let short = HistoryEntry::new("short", "v", "v", None);
        assert_eq!(short.upload_title(), "short");
    }
}
