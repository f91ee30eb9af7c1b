//! Voice catalog and filtering
//!
//! The catalog is fetched once at startup and is immutable for the session.
//! Filtering derives the selectable (language, gender, voice) combinations
//! the menus present.

pub mod select;

use crate::api::types::{Voice, VoiceGroup};
use std::fmt;
use std::str::FromStr;

pub use select::Selection;

/// Default cap on voices shown per language group
pub const MAX_VOICES_PER_GROUP: usize = 50;

/// Gender filter applied on top of a language selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderFilter {
    Female,
    Male,
    All,
}

impl GenderFilter {
    /// Does a voice's gender tag pass this filter?
    ///
    /// Untagged voices only pass the `All` filter.
    pub fn matches(&self, gender: &str) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Female => gender.eq_ignore_ascii_case("female"),
            GenderFilter::Male => gender.eq_ignore_ascii_case("male"),
        }
    }
}

impl fmt::Display for GenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenderFilter::Female => "female",
            GenderFilter::Male => "male",
            GenderFilter::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GenderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" | "female" => Ok(GenderFilter::Female),
            "m" | "male" => Ok(GenderFilter::Male),
            "a" | "all" => Ok(GenderFilter::All),
            other => Err(format!("unknown gender filter '{}'", other)),
        }
    }
}

/// A voice enriched with its parent group's language, for flat lookups
#[derive(Debug, Clone)]
pub struct FlatVoice {
    pub value: String,
    pub label: String,
    pub gender: String,
    pub lang: String,
    pub code: String,
}

/// The fetched voice catalog
pub struct VoiceCatalog {
    groups: Vec<VoiceGroup>,
    flat: Vec<FlatVoice>,
}

impl VoiceCatalog {
    /// Build the catalog from the server's nested groups
    ///
    /// Gender tags are normalized to lowercase once here so filters compare
    /// cheaply later.
    pub fn from_groups(mut groups: Vec<VoiceGroup>) -> Self {
        for group in &mut groups {
            for voice in &mut group.voices {
                voice.gender = voice.gender.trim().to_lowercase();
            }
        }

        let flat = groups
            .iter()
            .flat_map(|g| {
                g.voices.iter().map(|v| FlatVoice {
                    value: v.value.clone(),
                    label: v.label.clone(),
                    gender: v.gender.clone(),
                    lang: g.lang.clone(),
                    code: g.code.clone(),
                })
            })
            .collect();

        Self { groups, flat }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[VoiceGroup] {
        &self.groups
    }

    /// Distinct display languages, in catalog order
    pub fn languages(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for group in &self.groups {
            let lang = group.lang.trim();
            if !lang.is_empty() && !seen.contains(&lang) {
                seen.push(lang);
            }
        }
        seen
    }

    /// Look up a voice by its engine identifier
    pub fn find(&self, value: &str) -> Option<&FlatVoice> {
        self.flat.iter().find(|v| v.value == value)
    }

    /// Groups matching the language whose voices pass the gender filter,
    /// capped per group; groups left with no voices are dropped
    pub fn filtered_groups(
        &self,
        language: &str,
        gender: GenderFilter,
        cap: Option<usize>,
    ) -> Vec<(&VoiceGroup, Vec<&Voice>)> {
        self.groups
            .iter()
            .filter(|g| g.lang.trim() == language.trim())
            .map(|g| {
                let mut voices: Vec<&Voice> =
                    g.voices.iter().filter(|v| gender.matches(&v.gender)).collect();
                if let Some(cap) = cap {
                    voices.truncate(cap);
                }
                (g, voices)
            })
            .filter(|(_, voices)| !voices.is_empty())
            .collect()
    }

    /// Flat view of the voices the current filters make visible
    pub fn visible_voices(&self, language: &str, gender: GenderFilter) -> Vec<&FlatVoice> {
        self.flat
            .iter()
            .filter(|v| v.lang.trim() == language.trim() && gender.matches(&v.gender))
            .collect()
    }

    /// Does the language have any voice passing the gender filter?
    ///
    /// False here is what drives the "show all voices" fallback affordance.
    pub fn has_voices_for(&self, language: &str, gender: GenderFilter) -> bool {
        self.groups
            .iter()
            .filter(|g| g.lang.trim() == language.trim())
            .any(|g| g.voices.iter().any(|v| gender.matches(&v.gender)))
    }

    /// Short descriptive phrase used when sampling a voice
    pub fn sample_phrase(&self, voice_value: &str) -> String {
        match self.find(voice_value) {
            Some(voice) => format!("Sample of {} ({}).", voice.label, voice.lang),
            None => "This is a voice sample.".to_string(),
        }
    }
}
