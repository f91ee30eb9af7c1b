//! Blocking HTTP client for the studio server
//!
//! The bearer token is an explicit field of the client value and is attached
//! per request, so a cloned client for a background job carries exactly the
//! session it was created with.

use crate::api::types::{
    AuthResponse, MeResponse, SavedFileRecord, SpeakErrorBody, SpeakRequest, SpeakSuccess,
    UploadMeta, UploadResponse, UserRecord, ValidateResponse, VoiceGroup,
};
use crate::{Result, TtscError};
use log::{debug, info};
use reqwest::blocking::multipart;
use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;

/// Response header carrying the server's language detection result
pub const DETECTED_LANG_HEADER: &str = "x-detected-lang";

/// Client for all studio server endpoints
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TtscError::Api(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach a bearer token to all subsequent requests
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Drop the bearer token; subsequent requests carry no authorization
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a session token is attached
    pub fn has_session(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Apply the bearer credential, when present
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fetch the nested voice catalog
    pub fn voices(&self) -> Result<Vec<VoiceGroup>> {
        debug!("GET /api/voices");
        let resp = self.http.get(self.url("/api/voices")).send()?;
        if !resp.status().is_success() {
            return Err(TtscError::Api(format!(
                "Voice list failed: HTTP {}",
                resp.status()
            )));
        }
        let groups: Vec<VoiceGroup> = resp.json()?;
        info!("Fetched {} voice groups", groups.len());
        Ok(groups)
    }

    /// Create an account; returns the new session token and user
    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<(String, UserRecord)> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(TtscError::Validation(
                "Provide email and password".to_string(),
            ));
        }
        debug!("POST /api/register");
        let resp = self
            .http
            .post(self.url("/api/register"))
            .json(&serde_json::json!({ "email": email, "password": password, "name": name }))
            .send()?;
        Self::auth_result(resp, "Signup")
    }

    /// Exchange credentials for a session token and user
    pub fn login(&self, email: &str, password: &str) -> Result<(String, UserRecord)> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(TtscError::Validation(
                "Provide email and password".to_string(),
            ));
        }
        debug!("POST /api/login");
        let resp = self
            .http
            .post(self.url("/api/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;
        Self::auth_result(resp, "Login")
    }

    fn auth_result(
        resp: reqwest::blocking::Response,
        what: &str,
    ) -> Result<(String, UserRecord)> {
        let status = resp.status();
        let body: AuthResponse = resp
            .json()
            .map_err(|_| TtscError::Auth(format!("{} failed: HTTP {}", what, status)))?;
        match (body.ok, body.token, body.user) {
            (true, Some(token), Some(user)) => Ok((token, user)),
            _ => Err(TtscError::Auth(format!(
                "{} failed: {}",
                what,
                body.error.unwrap_or_else(|| format!("HTTP {}", status))
            ))),
        }
    }

    /// Validate the attached token against the server
    pub fn me(&self) -> Result<UserRecord> {
        debug!("GET /api/me");
        let resp = self.authorize(self.http.get(self.url("/api/me"))).send()?;
        let status = resp.status();
        let body: MeResponse = resp
            .json()
            .map_err(|_| TtscError::Auth(format!("Session check failed: HTTP {}", status)))?;
        match (body.ok, body.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(TtscError::Auth("unauthenticated".to_string())),
        }
    }

    /// List server-persisted uploads
    pub fn saved_files(&self) -> Result<Vec<SavedFileRecord>> {
        debug!("GET /api/history");
        let resp = self
            .authorize(self.http.get(self.url("/api/history")))
            .send()?;
        if !resp.status().is_success() {
            return Err(TtscError::Api(format!(
                "Saved file list failed: HTTP {}",
                resp.status()
            )));
        }
        Ok(resp.json()?)
    }

    /// Synthesize speech
    ///
    /// Rejects empty or whitespace-only text before any request goes out. A
    /// failure body's per-attempt records are carried through verbatim in the
    /// returned error.
    pub fn speak(&self, request: &SpeakRequest) -> Result<SpeakSuccess> {
        if request.text.trim().is_empty() {
            return Err(TtscError::Validation(
                "Please type text or select text".to_string(),
            ));
        }

        debug!(
            "POST /api/speak voice={} pitch={} rate={} volume={} enhance={}",
            request.voice, request.pitch, request.rate, request.volume, request.enhance
        );
        let resp = self
            .authorize(self.http.post(self.url("/api/speak")))
            .json(request)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(Self::synthesis_error(status, &text));
        }

        let detected_lang = detected_lang_from(
            resp.headers()
                .get(DETECTED_LANG_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        let audio = resp.bytes()?.to_vec();
        if audio.is_empty() {
            return Err(TtscError::Api("Empty audio data".to_string()));
        }

        info!(
            "Synthesized {} bytes with {} (detected: {:?})",
            audio.len(),
            request.voice,
            detected_lang
        );
        Ok(SpeakSuccess {
            audio,
            detected_lang,
        })
    }

    fn synthesis_error(status: reqwest::StatusCode, body: &str) -> TtscError {
        match serde_json::from_str::<SpeakErrorBody>(body) {
            Ok(parsed) => TtscError::Synthesis {
                message: parsed
                    .error
                    .unwrap_or_else(|| format!("HTTP {}", status)),
                attempts: parsed.attempts,
            },
            Err(_) => TtscError::Api(format!("Speak failed: HTTP {}", status)),
        }
    }

    /// Quick server-side check that a voice can synthesize at all
    pub fn validate_voice(&self, voice: &str) -> Result<bool> {
        debug!("GET /api/validate-voice?voice={}", voice);
        let resp = self
            .http
            .get(self.url("/api/validate-voice"))
            .query(&[("voice", voice)])
            .send()?;
        let body: ValidateResponse = resp.json()?;
        if let Some(error) = body.error {
            debug!("Voice validation reported: {}", error);
        }
        Ok(body.ok)
    }

    /// Upload a generated clip to server-side storage
    ///
    /// Requires an active session; rejected locally otherwise so the UI can
    /// prompt for authentication instead of burning a request.
    pub fn upload(
        &self,
        audio: Vec<u8>,
        filename: &str,
        title: &str,
        tags: &str,
    ) -> Result<UploadMeta> {
        if self.token.is_none() {
            return Err(TtscError::Auth(
                "Please login to save files".to_string(),
            ));
        }

        debug!("POST /api/upload {} ({} bytes)", filename, audio.len());
        let part = multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str("audio/mpeg")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("title", title.to_string())
            .text("tags", tags.to_string());

        let resp = self
            .authorize(self.http.post(self.url("/api/upload")))
            .multipart(form)
            .send()?;

        let status = resp.status();
        let body: UploadResponse = resp
            .json()
            .map_err(|_| TtscError::Api(format!("Upload failed: HTTP {}", status)))?;
        match (body.ok, body.meta) {
            (true, Some(meta)) => Ok(meta),
            _ => Err(TtscError::Api(format!(
                "Upload failed: {}",
                body.error.unwrap_or_else(|| format!("HTTP {}", status))
            ))),
        }
    }
}

/// Normalize the detected-language header value
///
/// A missing or blank header means no detection signal; the indicator stays
/// unset.
pub fn detected_lang_from(header: Option<&str>) -> Option<String> {
    header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_lang_missing_header_is_none() {
        assert_eq!(detected_lang_from(None), None);
        assert_eq!(detected_lang_from(Some("")), None);
        assert_eq!(detected_lang_from(Some("  ")), None);
    }

    #[test]
    fn test_detected_lang_is_uppercased() {
        assert_eq!(detected_lang_from(Some("en")), Some("EN".to_string()));
        assert_eq!(detected_lang_from(Some("ES")), Some("ES".to_string()));
    }

    #[test]
    fn test_token_toggling() {
        let mut client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert!(!client.has_session());
        assert_eq!(client.base_url(), "http://localhost:5000");

        client.set_token("abc");
        assert!(client.has_session());
        assert_eq!(client.token(), Some("abc"));

        client.clear_token();
        assert!(!client.has_session());
        assert_eq!(client.token(), None);
    }

    #[test]
    fn test_speak_rejects_whitespace_without_request() {
        // Unroutable port: if a request were issued this would error with a
        // transport failure, not a validation failure.
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let req = SpeakRequest::new("   \n\t", "en-US-AriaNeural", 0.0, 1.0, 1.0, false);
        match client.speak(&req) {
            Err(TtscError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
