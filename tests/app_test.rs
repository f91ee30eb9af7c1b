//! Application state integration tests
//!
//! Drives the App through applied job outcomes — the same path the event
//! loop uses — with the server pointed at an unroutable address so nothing
//! leaves the machine.

use std::sync::mpsc::Receiver;
use std::time::Duration;
use ttsc::api::types::{SpeakSuccess, UserRecord, VoiceGroup};
use ttsc::history::HISTORY_LIMIT;
use ttsc::jobs::{self, JobOutcome, SpeakPurpose};
use ttsc::state::config::Config;
use ttsc::state::App;
use ttsc::TtscError;

fn test_app(tmp: &tempfile::TempDir) -> (App, Receiver<JobOutcome>) {
    let mut config = Config::load_from(tmp.path().join("ttsc.cfg")).unwrap();
    config.set(
        "storage",
        "data_dir",
        tmp.path().join("state").to_str().unwrap(),
    );
    // Unroutable: any real request fails fast with a transport error
    config.set("api", "base_url", "http://127.0.0.1:1");

    let (runner, rx) = jobs::runner();
    let app = App::new(config, runner).unwrap();
    (app, rx)
}

fn load_catalog(app: &mut App) {
    let groups: Vec<VoiceGroup> = serde_json::from_str(
        r#"[{"lang":"English","voices":[
            {"value":"en-f","label":"Aria","gender":"female"},
            {"value":"en-m","label":"Guy","gender":"male"}]}]"#,
    )
    .unwrap();
    app.apply(JobOutcome::Catalog(Ok(groups)));
}

fn speech_outcome(text: &str, detected: Option<&str>) -> JobOutcome {
    JobOutcome::Speak {
        purpose: SpeakPurpose::Full {
            text: text.to_string(),
            voice_value: "en-f".to_string(),
            voice_label: "Aria".to_string(),
        },
        result: Ok(SpeakSuccess {
            audio: vec![0x49, 0x44, 0x33, 0x04],
            detected_lang: detected.map(str::to_string),
        }),
    }
}

fn clip_count(app: &App) -> usize {
    std::fs::read_dir(app.config.clips_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "mp3"))
        .count()
}

#[test]
fn test_catalog_load_auto_selects_first_language_female_voice() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);

    load_catalog(&mut app);

    assert_eq!(app.selection.language(), Some("English"));
    assert_eq!(app.selection.gender().map(|g| g.to_string()), Some("female".to_string()));
    assert_eq!(app.selection.voice(), Some("en-f"));
}

#[test]
fn test_empty_text_never_issues_a_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, rx) = test_app(&tmp);
    load_catalog(&mut app);

    // Empty buffer
    match app.start_speak(false) {
        Err(TtscError::Validation(_)) => {}
        other => panic!("expected validation error, got {:?}", other),
    }

    // Whitespace-only buffer
    app.text.set("   \n\t ");
    match app.start_speak(false) {
        Err(TtscError::Validation(_)) => {}
        other => panic!("expected validation error, got {:?}", other),
    }

    assert!(!app.speaking);
    // No job was spawned, so no outcome ever arrives
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_speech_success_updates_history_and_detection() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);
    load_catalog(&mut app);

    app.apply(speech_outcome("first text", Some("EN")));
    assert_eq!(app.history.len(), 1);
    assert_eq!(app.detected_lang.as_deref(), Some("EN"));
    assert!(app.history.entries()[0].clip_available());
    assert_eq!(clip_count(&app), 1);

    // Missing header leaves the indicator unset
    app.apply(speech_outcome("second text", None));
    assert_eq!(app.detected_lang, None);
    assert_eq!(app.history.len(), 2);
    assert_eq!(app.history.entries()[0].text, "second text");
    assert_eq!(app.history.entries()[1].text, "first text");
}

#[test]
fn test_history_eviction_releases_clips() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);
    load_catalog(&mut app);

    for n in 0..25 {
        app.apply(speech_outcome(&format!("text {}", n), None));
    }

    assert_eq!(app.history.len(), HISTORY_LIMIT);
    // Evicted entries took their clip files with them
    assert_eq!(clip_count(&app), HISTORY_LIMIT);
    assert_eq!(app.history.entries()[0].text, "text 24");
}

#[test]
fn test_sample_replacement_releases_previous_clip() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);
    load_catalog(&mut app);

    let sample = |voice: &str| JobOutcome::Speak {
        purpose: SpeakPurpose::Sample {
            voice_value: voice.to_string(),
        },
        result: Ok(SpeakSuccess {
            audio: vec![1, 2, 3],
            detected_lang: None,
        }),
    };

    app.apply(sample("en-f"));
    assert_eq!(clip_count(&app), 1);

    // The previous sample's file is gone once the next one lands
    app.apply(sample("en-m"));
    assert_eq!(clip_count(&app), 1);
    assert_eq!(app.sample_loading, None);
}

#[test]
fn test_sample_loading_is_tracked_by_voice_id() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, rx) = test_app(&tmp);
    load_catalog(&mut app);

    app.start_sample("en-f").unwrap();
    assert_eq!(app.sample_loading.as_deref(), Some("en-f"));

    // A second sample is refused while the first is in flight
    match app.start_sample("en-m") {
        Err(TtscError::Validation(_)) => {}
        other => panic!("expected validation error, got {:?}", other),
    }

    // The request fails fast against the unroutable server; applying the
    // outcome clears the marker
    let outcome = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("sample job should resolve");
    app.apply(outcome);
    assert_eq!(app.sample_loading, None);
}

#[test]
fn test_login_then_logout_clears_token_everywhere() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);

    app.apply(JobOutcome::Auth {
        signup: false,
        result: Ok((
            "tok-abc".to_string(),
            UserRecord {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
                name: "User".to_string(),
            },
        )),
    });
    assert!(app.client.has_session());
    assert_eq!(app.client.token(), Some("tok-abc"));
    assert!(app.config.token_path().exists());
    assert!(app.session.is_some());

    app.logout();
    assert!(!app.client.has_session());
    assert_eq!(app.client.token(), None);
    assert!(!app.config.token_path().exists());
    assert!(app.session.is_none());
}

#[test]
fn test_failed_restore_discards_cached_token() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);

    app.apply(JobOutcome::Auth {
        signup: true,
        result: Ok((
            "stale".to_string(),
            UserRecord {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
                name: String::new(),
            },
        )),
    });
    assert!(app.config.token_path().exists());

    app.apply(JobOutcome::Restore(Err(TtscError::Auth(
        "unauthenticated".to_string(),
    ))));
    assert!(!app.client.has_session());
    assert!(!app.config.token_path().exists());
}

#[test]
fn test_upload_without_session_is_rejected_locally() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, rx) = test_app(&tmp);
    load_catalog(&mut app);
    app.apply(speech_outcome("to upload", None));

    match app.upload_history_entry(0) {
        Err(TtscError::Auth(_)) => {}
        other => panic!("expected auth error, got {:?}", other),
    }
    // Rejected before any job was spawned
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_clear_resets_state_and_releases_clips() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut app, _rx) = test_app(&tmp);
    load_catalog(&mut app);

    app.text.set("some text");
    app.params.pitch = 1.5;
    app.apply(speech_outcome("entry", Some("EN")));
    assert_eq!(clip_count(&app), 1);

    app.clear();

    assert!(app.text.is_empty());
    assert_eq!(app.detected_lang, None);
    assert!(app.history.is_empty());
    assert_eq!(app.params.pitch, 0.0);
    assert_eq!(app.selection.language(), None);
    assert_eq!(clip_count(&app), 0);
}
