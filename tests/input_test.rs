//! Input system tests
//!
//! Tests key handler stack and key binding system

use ttsc::input::{create_default_keymap, HandlerAction, HandlerStack, KeyAction, KeyHandler};
use ttsc::Result;

struct TestHandler {
    handled: bool,
}

impl KeyHandler for TestHandler {
    fn process(&mut self, key: &[u8]) -> Result<HandlerAction> {
        if key == b"x" {
            self.handled = true;
            Ok(HandlerAction::Remove)
        } else {
            Ok(HandlerAction::Ignored)
        }
    }
}

#[test]
fn test_handler_stack() {
    let mut stack = HandlerStack::new();
    assert_eq!(stack.len(), 0);
    assert!(stack.is_empty());

    // Push handler
    stack.push(Box::new(TestHandler { handled: false }));
    assert_eq!(stack.len(), 1);

    // Process key that handler doesn't recognize
    let action = stack.process(b"a").unwrap();
    assert_eq!(action, HandlerAction::Ignored);
    assert_eq!(stack.len(), 1);

    // Process key that handler handles and removes itself
    let action = stack.process(b"x").unwrap();
    assert_eq!(action, HandlerAction::Remove);
    assert_eq!(stack.len(), 0);

    // Empty stack ignores keys
    let action = stack.process(b"x").unwrap();
    assert_eq!(action, HandlerAction::Ignored);
}

#[test]
fn test_keymap_creation() {
    let keymap = create_default_keymap();

    // Text entry keys
    assert_eq!(keymap.get(&b"t".to_vec()), Some(&KeyAction::EnterText));
    assert_eq!(keymap.get(&b"f".to_vec()), Some(&KeyAction::LoadFile));
    assert_eq!(keymap.get(&b"b".to_vec()), Some(&KeyAction::PasteText));
    assert_eq!(keymap.get(&b"y".to_vec()), Some(&KeyAction::CopyText));

    // Catalog keys
    assert_eq!(keymap.get(&b"l".to_vec()), Some(&KeyAction::ChooseLanguage));
    assert_eq!(keymap.get(&b"g".to_vec()), Some(&KeyAction::ChooseGender));
    assert_eq!(keymap.get(&b"v".to_vec()), Some(&KeyAction::ChooseVoice));

    // Synthesis keys
    assert_eq!(keymap.get(&b"s".to_vec()), Some(&KeyAction::Speak));
    assert_eq!(keymap.get(&b"S".to_vec()), Some(&KeyAction::SpeakEnhanced));
    assert_eq!(keymap.get(&b"a".to_vec()), Some(&KeyAction::SampleCurrent));

    // Session keys
    assert_eq!(keymap.get(&b"L".to_vec()), Some(&KeyAction::Login));
    assert_eq!(keymap.get(&b"R".to_vec()), Some(&KeyAction::Register));
    assert_eq!(keymap.get(&b"x".to_vec()), Some(&KeyAction::Logout));

    // Quit on q and ctrl+c
    assert_eq!(keymap.get(&b"q".to_vec()), Some(&KeyAction::Quit));
    assert_eq!(keymap.get(&b"\x03".to_vec()), Some(&KeyAction::Quit));
}

#[test]
fn test_keymap_has_no_duplicate_bindings() {
    let keymap = create_default_keymap();

    // Every binding resolves to exactly one action; sanity-check a few keys
    // that sit close together on the keyboard
    let keys: Vec<&[u8]> = vec![b"s", b"S", b"h", b"H", b"m", b"M", b"a", b"A"];
    for key in keys {
        assert!(keymap.contains_key(&key.to_vec()), "missing {:?}", key);
    }

    // Upper and lower case variants map to different actions
    assert_ne!(keymap.get(&b"s".to_vec()), keymap.get(&b"S".to_vec()));
    assert_ne!(keymap.get(&b"h".to_vec()), keymap.get(&b"H".to_vec()));
}
