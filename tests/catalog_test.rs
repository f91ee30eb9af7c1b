//! Voice catalog tests
//!
//! Tests catalog filtering, the gender fallback affordance, and the
//! deterministic auto-selection on load

use ttsc::api::types::VoiceGroup;
use ttsc::catalog::{GenderFilter, Selection, VoiceCatalog};

fn catalog() -> VoiceCatalog {
    let groups: Vec<VoiceGroup> = serde_json::from_str(
        r#"[
        {"lang":"English","code":"en-US","voices":[
            {"value":"en-f","label":"Aria (F)","gender":"Female"},
            {"value":"en-m","label":"Guy (M)","gender":"male"}
        ]},
        {"lang":"Hindi (IN)","code":"hi-IN","voices":[
            {"value":"hi-m1","label":"Madhur (M)","gender":"male"},
            {"value":"hi-m2","label":"Rohan (M)","gender":"male"}
        ]},
        {"lang":"Untagged","code":"xx","voices":[
            {"value":"xx-1","label":"Mystery"}
        ]}
    ]"#,
    )
    .unwrap();
    VoiceCatalog::from_groups(groups)
}

#[test]
fn test_initial_auto_selection_prefers_female() {
    let catalog = catalog();
    let selection = Selection::auto_select(&catalog);

    assert_eq!(selection.language(), Some("English"));
    assert_eq!(selection.gender(), Some(GenderFilter::Female));
    assert_eq!(selection.voice(), Some("en-f"));
    assert!(selection.is_ready());
}

#[test]
fn test_auto_selection_male_only_group() {
    let groups: Vec<VoiceGroup> = serde_json::from_str(
        r#"[{"lang":"Hindi (IN)","code":"hi-IN","voices":[
            {"value":"hi-m1","label":"Madhur (M)","gender":"male"}]}]"#,
    )
    .unwrap();
    let catalog = VoiceCatalog::from_groups(groups);
    let selection = Selection::auto_select(&catalog);

    assert_eq!(selection.gender(), Some(GenderFilter::Male));
    assert_eq!(selection.voice(), Some("hi-m1"));
}

#[test]
fn test_auto_selection_untagged_voices_fall_back_to_all() {
    let groups: Vec<VoiceGroup> = serde_json::from_str(
        r#"[{"lang":"Untagged","code":"xx","voices":[
            {"value":"xx-1","label":"Mystery"}]}]"#,
    )
    .unwrap();
    let catalog = VoiceCatalog::from_groups(groups);
    let selection = Selection::auto_select(&catalog);

    assert_eq!(selection.gender(), Some(GenderFilter::All));
    assert_eq!(selection.voice(), Some("xx-1"));
}

#[test]
fn test_auto_selection_empty_catalog() {
    let catalog = VoiceCatalog::from_groups(Vec::new());
    let selection = Selection::auto_select(&catalog);
    assert!(!selection.is_ready());
    assert_eq!(selection.language(), None);
}

#[test]
fn test_gender_normalization_and_filtering() {
    let catalog = catalog();

    // "Female" was normalized to lowercase at load
    let visible = catalog.visible_voices("English", GenderFilter::Female);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].value, "en-f");

    let all = catalog.visible_voices("English", GenderFilter::All);
    assert_eq!(all.len(), 2);

    // Untagged voices only show under the all filter
    assert!(catalog.visible_voices("Untagged", GenderFilter::Female).is_empty());
    assert_eq!(catalog.visible_voices("Untagged", GenderFilter::All).len(), 1);
}

#[test]
fn test_filtered_groups_caps_voices() {
    let catalog = catalog();
    let groups = catalog.filtered_groups("English", GenderFilter::All, Some(1));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1.len(), 1);

    // Groups left empty by the filter are dropped entirely
    let none = catalog.filtered_groups("Hindi (IN)", GenderFilter::Female, None);
    assert!(none.is_empty());
}

#[test]
fn test_zero_match_is_detectable() {
    let catalog = catalog();
    assert!(!catalog.has_voices_for("Hindi (IN)", GenderFilter::Female));
    assert!(catalog.has_voices_for("Hindi (IN)", GenderFilter::Male));
    assert!(catalog.has_voices_for("Hindi (IN)", GenderFilter::All));
}

#[test]
fn test_language_change_never_leaves_invalid_voice() {
    let catalog = catalog();
    let mut selection = Selection::auto_select(&catalog);
    assert_eq!(selection.voice(), Some("en-f"));

    // Hindi has no female voices: the voice must not stay at en-f
    selection.set_language(&catalog, "Hindi (IN)");
    assert_eq!(selection.voice(), None);
    assert!(selection.needs_fallback(&catalog));
    assert!(!selection.is_ready());

    // Falling back to all recovers a valid voice
    selection.fallback_to_all(&catalog);
    assert_eq!(selection.voice(), Some("hi-m1"));
    assert!(!selection.needs_fallback(&catalog));
}

#[test]
fn test_gender_change_revalidates_voice() {
    let catalog = catalog();
    let mut selection = Selection::auto_select(&catalog);

    selection.set_gender(&catalog, GenderFilter::Male);
    assert_eq!(selection.voice(), Some("en-m"));

    selection.set_gender(&catalog, GenderFilter::All);
    // en-m is still visible under all, so it is kept
    assert_eq!(selection.voice(), Some("en-m"));
}

#[test]
fn test_set_voice_rejects_hidden_voice() {
    let catalog = catalog();
    let mut selection = Selection::auto_select(&catalog);

    // en-m is filtered out while gender is female
    assert!(!selection.set_voice(&catalog, "en-m"));
    assert_eq!(selection.voice(), Some("en-f"));

    selection.set_gender(&catalog, GenderFilter::All);
    assert!(selection.set_voice(&catalog, "en-m"));
    assert_eq!(selection.voice(), Some("en-m"));
}

#[test]
fn test_languages_are_unique_in_order() {
    let catalog = catalog();
    assert_eq!(catalog.languages(), vec!["English", "Hindi (IN)", "Untagged"]);
}

#[test]
fn test_sample_phrase() {
    let catalog = catalog();
    assert_eq!(
        catalog.sample_phrase("en-f"),
        "Sample of Aria (F) (English)."
    );
    assert_eq!(catalog.sample_phrase("nope"), "This is a voice sample.");
}
