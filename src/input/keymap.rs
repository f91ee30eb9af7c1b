//! Default key bindings for the studio client

use std::collections::HashMap;

/// Key sequence type
pub type KeySequence = Vec<u8>;

/// Action identifier for key bindings
///
/// Each variant represents a client command that can be triggered by a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    // Text
    EnterText,
    LoadFile,
    PasteText,
    CopyText,
    SelectRange,
    ClearSelection,

    // Catalog selection
    ChooseLanguage,
    ChooseGender,
    ChooseVoice,
    ListVoices,

    // Synthesis
    Speak,
    SpeakEnhanced,
    SampleCurrent,
    SampleMenu,
    CheckVoice,

    // Playback and export
    PlayPreview,
    StopPlayback,
    DownloadPreview,

    // History and saved files
    ShowHistory,
    HistoryMenu,
    RefreshSaved,

    // Session
    Login,
    Register,
    Logout,

    // App
    Options,
    Status,
    ClearAll,
    Help,
    Quit,
}

/// Create the default keymap
pub fn create_default_keymap() -> HashMap<KeySequence, KeyAction> {
    let mut map = HashMap::new();

    // Text entry (t/f/b/y)
    map.insert(b"t".to_vec(), KeyAction::EnterText);
    map.insert(b"f".to_vec(), KeyAction::LoadFile);
    map.insert(b"b".to_vec(), KeyAction::PasteText);
    map.insert(b"y".to_vec(), KeyAction::CopyText);

    // Selection within the text (m/M)
    map.insert(b"m".to_vec(), KeyAction::SelectRange);
    map.insert(b"M".to_vec(), KeyAction::ClearSelection);

    // Catalog (l/g/v/c)
    map.insert(b"l".to_vec(), KeyAction::ChooseLanguage);
    map.insert(b"g".to_vec(), KeyAction::ChooseGender);
    map.insert(b"v".to_vec(), KeyAction::ChooseVoice);
    map.insert(b"c".to_vec(), KeyAction::ListVoices);

    // Synthesis (s/S/a/A/V)
    map.insert(b"s".to_vec(), KeyAction::Speak);
    map.insert(b"S".to_vec(), KeyAction::SpeakEnhanced);
    map.insert(b"a".to_vec(), KeyAction::SampleCurrent);
    map.insert(b"A".to_vec(), KeyAction::SampleMenu);
    map.insert(b"V".to_vec(), KeyAction::CheckVoice);

    // Playback (p/space/d)
    map.insert(b"p".to_vec(), KeyAction::PlayPreview);
    map.insert(b" ".to_vec(), KeyAction::StopPlayback);
    map.insert(b"d".to_vec(), KeyAction::DownloadPreview);

    // History and saved files (h/H/F)
    map.insert(b"h".to_vec(), KeyAction::ShowHistory);
    map.insert(b"H".to_vec(), KeyAction::HistoryMenu);
    map.insert(b"F".to_vec(), KeyAction::RefreshSaved);

    // Session (L/R/x)
    map.insert(b"L".to_vec(), KeyAction::Login);
    map.insert(b"R".to_vec(), KeyAction::Register);
    map.insert(b"x".to_vec(), KeyAction::Logout);

    // App (o/i/C/?/q, ctrl+c)
    map.insert(b"o".to_vec(), KeyAction::Options);
    map.insert(b"i".to_vec(), KeyAction::Status);
    map.insert(b"C".to_vec(), KeyAction::ClearAll);
    map.insert(b"?".to_vec(), KeyAction::Help);
    map.insert(b"q".to_vec(), KeyAction::Quit);
    map.insert(b"\x03".to_vec(), KeyAction::Quit);

    map
}
