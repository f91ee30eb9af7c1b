//! Voice selection state
//!
//! Tracks the language/gender/voice the user has picked and keeps the voice
//! consistent with the filters: changing either filter re-validates the
//! voice against the visible set, so an invalid voice is never left
//! selected.

use super::{GenderFilter, VoiceCatalog};
use log::debug;

/// Current (language, gender, voice) selection
#[derive(Debug, Clone, Default)]
pub struct Selection {
    language: Option<String>,
    gender: Option<GenderFilter>,
    voice: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic best-effort default on catalog load: first language,
    /// female if present else male else all, and a matching first voice
    pub fn auto_select(catalog: &VoiceCatalog) -> Self {
        let mut selection = Self::new();

        let Some(first) = catalog.groups().first() else {
            return selection;
        };
        selection.language = Some(first.lang.clone());

        if first.voices.is_empty() {
            return selection;
        }

        let female = first.voices.iter().any(|v| v.gender == "female");
        let male = first.voices.iter().any(|v| v.gender == "male");
        let gender = if female {
            GenderFilter::Female
        } else if male {
            GenderFilter::Male
        } else {
            GenderFilter::All
        };
        selection.gender = Some(gender);

        selection.voice = first
            .voices
            .iter()
            .find(|v| gender.matches(&v.gender))
            .map(|v| v.value.clone());

        debug!(
            "Auto-selected language={:?} gender={:?} voice={:?}",
            selection.language, selection.gender, selection.voice
        );
        selection
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn gender(&self) -> Option<GenderFilter> {
        self.gender
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    /// All three pieces picked?
    pub fn is_ready(&self) -> bool {
        self.language.is_some() && self.gender.is_some() && self.voice.is_some()
    }

    /// Both filters set but nothing passes them — the UI should offer the
    /// "show all voices" fallback
    pub fn needs_fallback(&self, catalog: &VoiceCatalog) -> bool {
        match (&self.language, self.gender) {
            (Some(lang), Some(gender)) => !catalog.has_voices_for(lang, gender),
            _ => false,
        }
    }

    pub fn set_language(&mut self, catalog: &VoiceCatalog, language: &str) {
        self.language = Some(language.to_string());
        self.revalidate(catalog);
    }

    pub fn set_gender(&mut self, catalog: &VoiceCatalog, gender: GenderFilter) {
        self.gender = Some(gender);
        self.revalidate(catalog);
    }

    /// Pick a voice; rejected when it isn't in the currently visible set
    pub fn set_voice(&mut self, catalog: &VoiceCatalog, value: &str) -> bool {
        let visible = match (&self.language, self.gender) {
            (Some(lang), Some(gender)) => catalog
                .visible_voices(lang, gender)
                .iter()
                .any(|v| v.value == value),
            _ => false,
        };
        if visible {
            self.voice = Some(value.to_string());
        }
        visible
    }

    /// Switch the gender filter to "all", keeping the voice when possible
    pub fn fallback_to_all(&mut self, catalog: &VoiceCatalog) {
        self.gender = Some(GenderFilter::All);
        self.revalidate(catalog);
    }

    pub fn clear(&mut self) {
        self.language = None;
        self.gender = None;
        self.voice = None;
    }

    /// Keep the voice consistent with the filters: drop it when it's no
    /// longer visible and fall back to the first visible voice, or none
    fn revalidate(&mut self, catalog: &VoiceCatalog) {
        let (lang, gender) = match (self.language.as_deref(), self.gender) {
            (Some(lang), Some(gender)) => (lang.to_string(), gender),
            _ => {
                self.voice = None;
                return;
            }
        };

        let visible = catalog.visible_voices(&lang, gender);
        let still_valid = self
            .voice
            .as_deref()
            .map(|current| visible.iter().any(|v| v.value == current))
            .unwrap_or(false);

        if !still_valid {
            self.voice = visible.first().map(|v| v.value.clone());
            debug!("Selection revalidated, voice now {:?}", self.voice);
        }
    }
}
