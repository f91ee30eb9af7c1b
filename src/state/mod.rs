//! Application state management
//!
//! The App struct is the central data structure for the client, holding
//! configuration, the API client, the fetched voice catalog, selection and
//! text state, the clip store, session history, and the auth session.
//!
//! All network outcomes flow through [`App::apply`], which the event loop
//! calls as job results arrive.

pub mod config;
pub mod text;

use crate::api::types::{SavedFileRecord, SpeakRequest, SpeakSuccess, VoiceGroup};
use crate::api::ApiClient;
use crate::audio::{create_player, AudioClip, AudioStore, Player};
use crate::catalog::{GenderFilter, Selection, VoiceCatalog};
use crate::history::{HistoryEntry, SessionHistory};
use crate::input::HandlerStack;
use crate::jobs::{JobOutcome, JobRunner, SpeakPurpose};
use crate::notify::{ConsoleNotifier, Notifier};
use crate::session::{Session, SessionStore};
use crate::view::emit;
use crate::{Result, TtscError};
use config::Config;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Pitch/rate/volume for the next synthesis
#[derive(Debug, Clone, Copy)]
pub struct SpeechParams {
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

/// Main application state for the studio client
pub struct App {
    /// Configuration loaded from ~/.ttsc.cfg
    pub config: Config,

    /// HTTP client; carries the bearer token for the active session
    pub client: ApiClient,

    /// Voice catalog, present once the startup fetch lands
    pub catalog: Option<VoiceCatalog>,

    /// Current language/gender/voice selection
    pub selection: Selection,

    /// Text to synthesize, with optional selection range
    pub text: text::TextBuffer,

    /// Speech parameters for the next request
    pub params: SpeechParams,

    /// Play generated speech as soon as it arrives
    pub autoplay: bool,

    /// Server-side language detection result for the last synthesis
    pub detected_lang: Option<String>,

    /// Capped, newest-first session history; owns the clips it references
    pub history: SessionHistory,

    /// Server-persisted uploads, as last fetched
    pub saved: Vec<SavedFileRecord>,

    /// Active auth session, when signed in
    pub session: Option<Session>,

    session_store: SessionStore,

    /// Clip files for this session
    pub audio: AudioStore,

    /// Playback backend
    pub player: Box<dyn Player>,

    /// Clip shown in the preview slot; the file belongs to a history entry
    preview: Option<PathBuf>,

    /// Sample clip; owned here and released when the next sample replaces it
    sample_clip: Option<AudioClip>,

    /// Voice id whose sample is currently loading
    ///
    /// Tracked by id, not a boolean, so the UI can mark the right voice in a
    /// sample list.
    pub sample_loading: Option<String>,

    /// A full synthesis request is in flight
    pub speaking: bool,

    /// Key handler stack for modal input
    pub handlers: HandlerStack,

    /// Where user-facing messages go
    pub notifier: Box<dyn Notifier>,

    jobs: JobRunner,
}

impl App {
    /// Create the application state
    ///
    /// Performs no network I/O; call [`App::bootstrap`] to kick off the
    /// catalog fetch and session restoration.
    pub fn new(config: Config, jobs: JobRunner) -> Result<Self> {
        Self::with_notifier(config, jobs, Box::new(ConsoleNotifier::new()))
    }

    pub fn with_notifier(
        config: Config,
        jobs: JobRunner,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        std::fs::create_dir_all(config.data_dir())?;

        let client = ApiClient::new(&config.base_url(), config.timeout())?;
        info!("API client for {}", client.base_url());

        let audio = AudioStore::open(config.clips_dir())?;
        let history = SessionHistory::load(config.history_path());
        let session_store = SessionStore::new(config.token_path());

        let params = SpeechParams {
            pitch: config.pitch(),
            rate: config.rate(),
            volume: config.volume(),
        };
        let autoplay = config.autoplay();

        Ok(Self {
            config,
            client,
            catalog: None,
            selection: Selection::new(),
            text: text::TextBuffer::new(),
            params,
            autoplay,
            detected_lang: None,
            history,
            saved: Vec::new(),
            session: None,
            session_store,
            audio,
            player: create_player(),
            preview: None,
            sample_clip: None,
            sample_loading: None,
            speaking: false,
            handlers: HandlerStack::new(),
            notifier,
            jobs,
        })
    }

    /// Start the catalog fetch and, when a token is cached, session
    /// restoration
    pub fn bootstrap(&mut self) {
        self.jobs.fetch_catalog(self.client.clone());

        if crate::session::attach_cached_token(&self.session_store, &mut self.client).is_some() {
            debug!("Cached token found, validating");
            self.jobs.restore_session(self.client.clone());
        }
    }

    /// Report a failure through the notifier
    pub fn report(&self, error: &TtscError) {
        self.notifier.error(error);
    }

    // ========== Job outcomes ==========

    /// Apply a completed background job
    pub fn apply(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Catalog(Ok(groups)) => self.catalog_loaded(groups),
            JobOutcome::Catalog(Err(e)) => {
                self.notifier.error(&e);
                self.notifier
                    .info("The voice catalog could not be loaded; check the server and restart.");
            }

            JobOutcome::Speak { purpose, result } => match purpose {
                SpeakPurpose::Full {
                    text,
                    voice_value,
                    voice_label,
                } => self.full_speech_done(text, voice_value, voice_label, result),
                SpeakPurpose::Sample { voice_value } => self.sample_done(voice_value, result),
            },

            JobOutcome::Auth { signup, result } => match result {
                Ok((token, user)) => {
                    if let Err(e) = self.session_store.save_token(&token) {
                        warn!("Failed to cache session token: {}", e);
                    }
                    self.client.set_token(&token);
                    let what = if signup {
                        "Account created for"
                    } else {
                        "Signed in as"
                    };
                    self.notifier.success(&format!("{} {}", what, user.email));
                    self.session = Some(Session { token, user });
                    // The saved-files view is per-user; refresh it
                    self.jobs.fetch_saved(self.client.clone());
                }
                Err(e) => self.notifier.error(&e),
            },

            JobOutcome::Restore(Ok(user)) => {
                let token = self.client.token().unwrap_or_default().to_string();
                self.notifier
                    .info(&format!("Session restored for {}", user.email));
                self.session = Some(Session { token, user });
            }
            JobOutcome::Restore(Err(e)) => {
                // Stale token: drop it silently
                debug!("Cached session rejected: {}", e);
                self.session_store.clear();
                self.client.clear_token();
            }

            JobOutcome::Saved(Ok(list)) => {
                info!("Fetched {} saved files", list.len());
                self.saved = list;
                self.show_saved();
            }
            JobOutcome::Saved(Err(e)) => self.notifier.error(&e),

            JobOutcome::Upload(Ok(meta)) => {
                self.notifier
                    .success(&format!("Uploaded to server: {}", meta.title));
                self.jobs.fetch_saved(self.client.clone());
            }
            JobOutcome::Upload(Err(e)) => self.notifier.error(&e),

            JobOutcome::VoiceCheck {
                voice_value,
                result,
            } => match result {
                Ok(true) => self.notifier.success(&format!("{} validated", voice_value)),
                Ok(false) => self
                    .notifier
                    .warn(&format!("{} failed server-side validation", voice_value)),
                Err(e) => self.notifier.error(&e),
            },
        }
    }

    fn catalog_loaded(&mut self, groups: Vec<VoiceGroup>) {
        let catalog = VoiceCatalog::from_groups(groups);
        let voices: usize = catalog.groups().iter().map(|g| g.voices.len()).sum();
        self.notifier.info(&format!(
            "Voice catalog loaded: {} languages, {} voices",
            catalog.languages().len(),
            voices
        ));

        self.selection = Selection::auto_select(&catalog);
        if let Some(voice) = self.selection.voice() {
            if let Some(meta) = catalog.find(voice) {
                self.notifier
                    .info(&format!("Selected {} — {}", meta.lang, meta.label));
            }
        }
        self.catalog = Some(catalog);
    }

    fn full_speech_done(
        &mut self,
        text: String,
        voice_value: String,
        voice_label: String,
        result: Result<SpeakSuccess>,
    ) {
        self.speaking = false;
        let success = match result {
            Ok(s) => s,
            Err(e) => {
                self.notifier.error(&e);
                return;
            }
        };

        // A success without the header leaves the indicator unset
        self.detected_lang = success.detected_lang.clone();

        let clip = match self.audio.store(&success.audio) {
            Ok(clip) => clip,
            Err(e) => {
                self.notifier.error(&e);
                return;
            }
        };

        let entry = HistoryEntry::new(
            &text,
            &voice_label,
            &voice_value,
            Some(clip.path().to_path_buf()),
        );
        self.preview = Some(clip.path().to_path_buf());

        // The history owns clip files; eviction releases them
        for evicted in self.history.push(entry) {
            if let Some(path) = evicted.clip_path {
                if let Err(e) = self.audio.release_path(&path) {
                    warn!("Failed to release evicted clip: {}", e);
                }
            }
        }

        let mut note = format!("Generated {} bytes with {}", success.audio.len(), voice_label);
        if let Some(lang) = &self.detected_lang {
            note.push_str(&format!(" (detected: {})", lang));
        }
        self.notifier.success(&note);

        if self.autoplay {
            if let Err(e) = self.player.play(success.audio) {
                self.notifier.error(&e);
            }
        }
    }

    fn sample_done(&mut self, voice_value: String, result: Result<SpeakSuccess>) {
        if self.sample_loading.as_deref() != Some(voice_value.as_str()) {
            // A stale sample resolving after state moved on; applied anyway,
            // matching the no-cancellation request model
            debug!("Sample for {} resolved without a loading marker", voice_value);
        }
        self.sample_loading = None;

        let success = match result {
            Ok(s) => s,
            Err(e) => {
                self.notifier.error(&e);
                return;
            }
        };

        // Release the previous sample before the new one takes its place
        if let Err(e) = self.audio.release_slot(&mut self.sample_clip) {
            warn!("Failed to release previous sample: {}", e);
        }
        match self.audio.store(&success.audio) {
            Ok(clip) => self.sample_clip = Some(clip),
            Err(e) => {
                self.notifier.error(&e);
                return;
            }
        }

        if let Err(e) = self.player.play(success.audio) {
            self.notifier.error(&e);
        }
    }

    // ========== Synthesis ==========

    /// Kick off a full synthesis of the current text
    pub fn start_speak(&mut self, enhance: bool) -> Result<()> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| TtscError::Validation("Voice catalog not loaded yet".to_string()))?;

        if !self.selection.is_ready() {
            return Err(TtscError::Validation(
                "Choose a language, gender and voice first".to_string(),
            ));
        }
        let voice_value = self.selection.voice().unwrap_or_default().to_string();
        let voice_label = catalog
            .find(&voice_value)
            .map(|v| v.label.clone())
            .unwrap_or_else(|| voice_value.clone());

        // Rejected before any request is sent
        let Some(text) = self.text.effective_text() else {
            return Err(TtscError::Validation(
                "Please type text or select text".to_string(),
            ));
        };

        if self.speaking {
            return Err(TtscError::Validation(
                "Speech generation already in progress".to_string(),
            ));
        }

        self.speaking = true;
        self.detected_lang = None;

        let request = SpeakRequest::new(
            &text,
            &voice_value,
            self.params.pitch,
            self.params.rate,
            self.params.volume,
            enhance,
        );
        self.notifier.info(if enhance {
            "Generating (enhanced)..."
        } else {
            "Generating..."
        });
        self.jobs.speak(
            self.client.clone(),
            request,
            SpeakPurpose::Full {
                text,
                voice_value,
                voice_label,
            },
        );
        Ok(())
    }

    /// Kick off a short sample for a voice
    pub fn start_sample(&mut self, voice_value: &str) -> Result<()> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| TtscError::Validation("Voice catalog not loaded yet".to_string()))?;

        if let Some(loading) = &self.sample_loading {
            return Err(TtscError::Validation(format!(
                "A sample for {} is already loading",
                loading
            )));
        }

        let phrase = catalog.sample_phrase(voice_value);
        // Samples use fixed default parameters
        let request = SpeakRequest::new(&phrase, voice_value, 0.0, 1.0, 1.0, false);

        self.sample_loading = Some(voice_value.to_string());
        self.notifier.info(&format!("Sampling {}...", voice_value));
        self.jobs.speak(
            self.client.clone(),
            request,
            SpeakPurpose::Sample {
                voice_value: voice_value.to_string(),
            },
        );
        Ok(())
    }

    /// Sample the currently selected voice
    pub fn sample_current(&mut self) -> Result<()> {
        let Some(voice) = self.selection.voice().map(str::to_string) else {
            return Err(TtscError::Validation(
                "Please select a voice to sample".to_string(),
            ));
        };
        self.start_sample(&voice)
    }

    /// Ask the server to validate a voice
    pub fn check_voice(&mut self, voice_value: &str) {
        self.jobs
            .validate_voice(self.client.clone(), voice_value.to_string());
    }

    // ========== Selection ==========

    /// Warn when the current filters leave no voices, offering the fallback
    fn warn_if_fallback_needed(&self) {
        let Some(catalog) = &self.catalog else { return };
        if self.selection.needs_fallback(catalog) {
            let gender = self
                .selection
                .gender()
                .map(|g| g.to_string())
                .unwrap_or_default();
            let language = self.selection.language().unwrap_or_default();
            self.notifier.warn(&format!(
                "No {} voices for {}. Press g and pick 'all' to show every voice.",
                gender, language
            ));
        }
    }

    pub fn set_language(&mut self, language: &str) {
        if let Some(catalog) = &self.catalog {
            self.selection.set_language(catalog, language);
            self.warn_if_fallback_needed();
        }
    }

    pub fn set_gender(&mut self, gender: GenderFilter) {
        if let Some(catalog) = &self.catalog {
            self.selection.set_gender(catalog, gender);
            self.warn_if_fallback_needed();
        }
    }

    pub fn set_voice(&mut self, voice_value: &str) -> bool {
        match &self.catalog {
            Some(catalog) => self.selection.set_voice(catalog, voice_value),
            None => false,
        }
    }

    // ========== Text ==========

    /// Load the text buffer from a plain-text file
    pub fn load_text_file(&mut self, path: &str) -> Result<()> {
        let path = Path::new(path.trim());
        if path.extension().map(|e| e != "txt").unwrap_or(true) {
            return Err(TtscError::Validation("Please load a .txt file".to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        self.text.set(&content);
        self.notifier
            .info(&format!("Loaded {} characters", self.text.char_count()));
        Ok(())
    }

    /// Replace the text buffer with the clipboard contents
    pub fn paste_text(&mut self) -> Result<()> {
        let content = crate::clipboard::get_from_clipboard()?;
        self.text.set(&content);
        self.notifier
            .info(&format!("Pasted {} characters", self.text.char_count()));
        Ok(())
    }

    /// Copy the text buffer to the clipboard
    pub fn copy_text(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(TtscError::Validation("Nothing to copy".to_string()));
        }
        crate::clipboard::copy_to_clipboard(self.text.content())
    }

    // ========== History, preview, upload ==========

    /// Play the preview clip (the most recent full synthesis)
    pub fn play_preview(&mut self) -> Result<()> {
        let Some(path) = self.preview.clone() else {
            return Err(TtscError::Validation(
                "No audio yet — generate speech to preview".to_string(),
            ));
        };
        self.player.play_file(&path)
    }

    /// Export the preview clip to a file
    pub fn download_preview(&mut self, dest: &str) -> Result<()> {
        let Some(path) = self.preview.clone() else {
            return Err(TtscError::Validation(
                "No audio yet — generate speech first".to_string(),
            ));
        };
        export_to(&self.audio, &path, dest, self.notifier.as_ref())
    }

    /// Play a history entry's clip
    pub fn play_history_entry(&mut self, index: usize) -> Result<()> {
        let entry = self
            .history
            .get(index)
            .ok_or_else(|| TtscError::Validation("No such history entry".to_string()))?;
        let Some(path) = entry.clip_path.clone().filter(|p| p.exists()) else {
            return Err(TtscError::Validation(
                "This entry's audio expired with its session".to_string(),
            ));
        };
        self.preview = Some(path.clone());
        self.player.play_file(&path)
    }

    /// Push a history entry's clip to server-side storage
    ///
    /// Requires an active session; rejected with an authentication prompt
    /// otherwise.
    pub fn upload_history_entry(&mut self, index: usize) -> Result<()> {
        if !self.client.has_session() {
            return Err(TtscError::Auth("Please login to save files".to_string()));
        }

        let entry = self
            .history
            .get(index)
            .ok_or_else(|| TtscError::Validation("No such history entry".to_string()))?;
        let Some(path) = entry.clip_path.clone().filter(|p| p.exists()) else {
            return Err(TtscError::Validation(
                "This entry's audio expired with its session".to_string(),
            ));
        };

        let audio = std::fs::read(&path)?;
        let filename = format!("tts_{}.mp3", entry.created_at);
        let title = entry.upload_title();

        self.notifier.info("Uploading...");
        self.jobs.upload(
            self.client.clone(),
            audio,
            filename,
            title,
            "generated,tts".to_string(),
        );
        Ok(())
    }

    /// Export a history entry's clip to a file
    pub fn download_history_entry(&mut self, index: usize, dest: &str) -> Result<()> {
        let entry = self
            .history
            .get(index)
            .ok_or_else(|| TtscError::Validation("No such history entry".to_string()))?;
        let Some(path) = entry.clip_path.clone() else {
            return Err(TtscError::Validation(
                "This entry's audio expired with its session".to_string(),
            ));
        };
        export_to(&self.audio, &path, dest, self.notifier.as_ref())
    }

    /// Fetch the server-side saved files list
    pub fn refresh_saved(&mut self) {
        self.notifier.info("Fetching saved files...");
        self.jobs.fetch_saved(self.client.clone());
    }

    // ========== Auth ==========

    pub fn login(&mut self, email: String, password: String) {
        self.jobs.login(self.client.clone(), email, password);
    }

    pub fn register(&mut self, email: String, password: String, name: String) {
        self.jobs.register(self.client.clone(), email, password, name);
    }

    /// End the session: drop the cached token and the attached header
    pub fn logout(&mut self) {
        self.session = None;
        self.session_store.clear();
        self.client.clear_token();
        self.notifier.info("Signed out");
    }

    // ========== Reset ==========

    /// Reset the working state: text, selection, parameters, filters,
    /// detection indicator, clips and session history
    pub fn clear(&mut self) {
        self.text.clear();
        self.detected_lang = None;
        self.preview = None;
        if let Err(e) = self.audio.release_slot(&mut self.sample_clip) {
            warn!("Failed to release sample clip: {}", e);
        }
        for entry in self.history.clear() {
            if let Some(path) = entry.clip_path {
                if let Err(e) = self.audio.release_path(&path) {
                    warn!("Failed to release history clip: {}", e);
                }
            }
        }
        self.params = SpeechParams {
            pitch: 0.0,
            rate: 1.0,
            volume: 1.0,
        };
        self.selection.clear();
        self.player.stop();
        self.notifier.info("Cleared");
    }

    // ========== Display ==========

    /// Print the current state summary
    pub fn show_status(&self) {
        emit(&format!("Server: {}", self.client.base_url()));
        match &self.session {
            Some(s) => emit(&format!("Signed in as {}", s.user.email)),
            None => emit("Not signed in"),
        }
        emit(&format!(
            "Language: {}  Gender: {}  Voice: {}",
            self.selection.language().unwrap_or("-"),
            self.selection
                .gender()
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.selection.voice().unwrap_or("-")
        ));
        emit(&format!(
            "Pitch: {:.1}  Rate: {:.1}  Volume: {:.1}  Autoplay: {}",
            self.params.pitch, self.params.rate, self.params.volume, self.autoplay
        ));
        let preview = crate::view::truncate_display(
            &self.text.content().replace('\n', " "),
            crate::view::TEXT_PREVIEW_WIDTH,
        );
        emit(&format!(
            "Text: {}",
            if preview.is_empty() { "(empty)" } else { &preview }
        ));
        if let Some((start, end)) = self.text.selection() {
            emit(&format!("Selection: chars {}..{}", start, end));
        }
        if let Some(lang) = &self.detected_lang {
            emit(&format!("Detected: {}", lang));
        }
        emit(&format!(
            "History: {} entries  Playback: {}",
            self.history.len(),
            self.player.name()
        ));
    }

    /// Print the session history
    pub fn show_history(&self) {
        if self.history.is_empty() {
            emit("No session history");
            return;
        }
        emit("Session history (newest first):");
        for (i, entry) in self.history.entries().iter().enumerate() {
            emit(&crate::view::history_row(i, entry));
        }
    }

    /// Print the saved-files list
    pub fn show_saved(&self) {
        if self.saved.is_empty() {
            emit("No saved files");
            return;
        }
        emit("Saved files (server):");
        for (i, record) in self.saved.iter().enumerate() {
            emit(&crate::view::saved_row(i, record));
        }
    }
}

fn export_to(audio: &AudioStore, clip: &Path, dest: &str, notifier: &dyn Notifier) -> Result<()> {
    let dest = dest.trim();
    if dest.is_empty() {
        return Err(TtscError::Validation(
            "Provide a destination path".to_string(),
        ));
    }
    audio.export(clip, Path::new(dest))?;
    notifier.success(&format!("Saved to {}", dest));
    Ok(())
}
