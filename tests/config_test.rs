//! Configuration loading tests
//!
//! Tests that client configuration loads correctly and provides expected
//! default values

use ttsc::state::config::{Config, DEFAULT_API_BASE};

#[test]
fn test_defaults_are_written_and_readable() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ttsc.cfg");

    let config = Config::load_from(path.clone()).expect("Failed to create default config");
    assert!(path.exists());

    assert_eq!(config.base_url(), DEFAULT_API_BASE);
    assert_eq!(config.timeout().as_secs(), 30);
    assert_eq!(config.pitch(), 0.0);
    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.volume(), 1.0);
    assert!(config.autoplay());
    assert_eq!(config.voices_per_group(), 50);
}

#[test]
fn test_set_save_reload_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ttsc.cfg");

    {
        let mut config = Config::load_from(path.clone()).unwrap();
        config.set("api", "base_url", "http://tts.example:8080");
        config.set("speech", "rate", "1.5");
        config.set("speech", "autoplay", "false");
        config.save().unwrap();
    }

    let config = Config::load_from(path).unwrap();
    assert_eq!(config.base_url(), "http://tts.example:8080");
    assert_eq!(config.rate(), 1.5);
    assert!(!config.autoplay());
}

#[test]
fn test_out_of_range_params_are_clamped() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::load_from(tmp.path().join("ttsc.cfg")).unwrap();

    config.set("speech", "pitch", "99");
    config.set("speech", "rate", "0.01");
    config.set("speech", "volume", "-3");

    assert_eq!(config.pitch(), 2.0);
    assert_eq!(config.rate(), 0.5);
    assert_eq!(config.volume(), 0.0);
}

#[test]
fn test_unparseable_values_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::load_from(tmp.path().join("ttsc.cfg")).unwrap();

    config.set("speech", "rate", "fast");
    config.set("api", "timeout_secs", "soon");

    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.timeout().as_secs(), 30);
}

#[test]
fn test_storage_paths_follow_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::load_from(tmp.path().join("ttsc.cfg")).unwrap();
    config.set("storage", "data_dir", tmp.path().join("state").to_str().unwrap());

    let data = tmp.path().join("state");
    assert_eq!(config.data_dir(), data);
    assert_eq!(config.history_path(), data.join("history.json"));
    assert_eq!(config.token_path(), data.join("token"));
    assert_eq!(config.clips_dir(), data.join("clips"));
}
