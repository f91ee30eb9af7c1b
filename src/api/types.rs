//! Wire types for the studio server's JSON API
//!
//! These mirror the server's payloads; fields the client does not display
//! are left out and ignored during deserialization.

use serde::{Deserialize, Serialize};

/// One language block of the nested voice catalog
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceGroup {
    /// Display language, e.g. "English (US)"
    pub lang: String,
    /// BCP-47-ish language code, e.g. "en-US"
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub voices: Vec<Voice>,
}

/// A single selectable voice within a language block
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    /// Engine-specific identifier, e.g. "en-US-AriaNeural"
    pub value: String,
    /// Human-readable label shown in menus
    pub label: String,
    /// "female" / "male" / empty when the server doesn't know
    #[serde(default)]
    pub gender: String,
}

/// Authenticated user projection returned by register/login/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Response envelope for the auth endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub ok: bool,
    pub token: Option<String>,
    pub user: Option<UserRecord>,
    pub error: Option<String>,
}

/// Envelope for `GET /api/me`
#[derive(Debug, Deserialize)]
pub(crate) struct MeResponse {
    #[serde(default)]
    pub ok: bool,
    pub user: Option<UserRecord>,
}

/// Server-persisted upload, projected for display
#[derive(Debug, Clone, Deserialize)]
pub struct SavedFileRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub public_url: Option<String>,
    /// Server-local path, kept only as a download fallback
    pub file: Option<String>,
}

impl SavedFileRecord {
    /// URL (or server path) the clip can be fetched from
    pub fn download_url(&self) -> Option<&str> {
        self.public_url.as_deref().or(self.file.as_deref())
    }
}

/// Body of `POST /api/speak`
///
/// Pitch/rate/volume travel as strings, matching the server's slider-style
/// parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakRequest {
    pub text: String,
    pub voice: String,
    pub pitch: String,
    pub rate: String,
    pub volume: String,
    pub tone: String,
    pub enhance: bool,
}

impl SpeakRequest {
    pub fn new(text: &str, voice: &str, pitch: f32, rate: f32, volume: f32, enhance: bool) -> Self {
        Self {
            text: text.to_string(),
            voice: voice.to_string(),
            pitch: format!("{:.1}", pitch),
            rate: format!("{:.1}", rate),
            volume: format!("{:.1}", volume),
            tone: "none".to_string(),
            enhance,
        }
    }
}

/// Successful synthesis: raw audio plus the optional detected-language
/// signal carried in a response header
#[derive(Debug, Clone)]
pub struct SpeakSuccess {
    pub audio: Vec<u8>,
    pub detected_lang: Option<String>,
}

/// One server-side synthesis attempt from a failure body
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisAttempt {
    pub voice: String,
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
}

impl SynthesisAttempt {
    /// Render the attempt the way the server described it
    pub fn describe(&self) -> String {
        match (&self.error, self.ok) {
            (Some(e), _) => format!("{} - {}", self.voice, e),
            (None, true) => format!("{} - ok", self.voice),
            (None, false) => format!("{} - failed", self.voice),
        }
    }
}

/// Error body of a failed `POST /api/speak`
#[derive(Debug, Deserialize)]
pub(crate) struct SpeakErrorBody {
    pub error: Option<String>,
    #[serde(default)]
    pub attempts: Vec<SynthesisAttempt>,
}

/// Metadata returned for a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadMeta {
    pub title: String,
    pub filename: String,
}

/// Envelope for `POST /api/upload`
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub ok: bool,
    pub meta: Option<UploadMeta>,
    pub error: Option<String>,
}

/// Envelope for `GET /api/validate-voice`
#[derive(Debug, Deserialize)]
pub(crate) struct ValidateResponse {
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_parsing_ignores_extra_fields() {
        let json = r#"[{"lang":"English (US)","code":"en-US","voices":[
            {"label":"Aria (F)","value":"en-US-AriaNeural","gender":"female",
             "style":"cheerful","pitch_offset":0.12}]}]"#;
        let groups: Vec<VoiceGroup> = serde_json::from_str(json).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].code, "en-US");
        assert_eq!(groups[0].voices[0].value, "en-US-AriaNeural");
        assert_eq!(groups[0].voices[0].gender, "female");
    }

    #[test]
    fn test_speak_error_body_with_attempts() {
        let json = r#"{"error":"TTS generation failed for all attempts.",
            "attempts":[{"voice":"en-US-AriaNeural","use_express":true,"ok":false,"error":"timeout"},
                        {"voice":"en-US-GuyNeural","ok":true}]}"#;
        let body: SpeakErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.attempts.len(), 2);
        assert_eq!(body.attempts[0].describe(), "en-US-AriaNeural - timeout");
        assert_eq!(body.attempts[1].describe(), "en-US-GuyNeural - ok");
    }

    #[test]
    fn test_saved_file_download_url_fallback() {
        let with_url: SavedFileRecord = serde_json::from_str(
            r#"{"id":"a1","title":"t","tags":["generated"],"public_url":"http://h/files/a1.mp3"}"#,
        )
        .unwrap();
        assert_eq!(with_url.download_url(), Some("http://h/files/a1.mp3"));

        let path_only: SavedFileRecord =
            serde_json::from_str(r#"{"id":"a2","title":"t","file":"/saved/a2.mp3"}"#).unwrap();
        assert_eq!(path_only.download_url(), Some("/saved/a2.mp3"));
        assert!(path_only.tags.is_empty());
    }

    #[test]
    fn test_speak_request_formats_params() {
        let req = SpeakRequest::new("hi", "en-US-AriaNeural", 0.0, 1.0, 1.5, false);
        assert_eq!(req.pitch, "0.0");
        assert_eq!(req.rate, "1.0");
        assert_eq!(req.volume, "1.5");
        assert_eq!(req.tone, "none");
    }
}
