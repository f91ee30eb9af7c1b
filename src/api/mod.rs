//! HTTP client for the text-to-speech studio server

pub mod client;
pub mod types;

pub use client::{ApiClient, DETECTED_LANG_HEADER};
pub use types::{
    SavedFileRecord, SpeakRequest, SpeakSuccess, SynthesisAttempt, UploadMeta, UserRecord, Voice,
    VoiceGroup,
};
