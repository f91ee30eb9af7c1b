//! Background network jobs
//!
//! Every network call runs as an independent job on its own thread, with a
//! clone of the API client carrying whatever session was active when the
//! job started. Outcomes come back over a channel the event loop drains
//! between keystrokes, so the UI never blocks on the server.
//!
//! There is no cancellation: a job whose originating state has since changed
//! still resolves, and its outcome is applied as-is.

use crate::api::types::{SavedFileRecord, SpeakRequest, SpeakSuccess, UploadMeta, UserRecord, VoiceGroup};
use crate::api::ApiClient;
use crate::Result;
use log::{debug, warn};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// What a synthesis result is for
#[derive(Debug, Clone)]
pub enum SpeakPurpose {
    /// Full synthesis of the user's text; becomes a history entry
    Full {
        text: String,
        voice_value: String,
        voice_label: String,
    },
    /// Short per-voice sample; replaces the previous sample clip
    Sample { voice_value: String },
}

/// Completed job, delivered to the event loop
pub enum JobOutcome {
    Catalog(Result<Vec<VoiceGroup>>),
    Speak {
        purpose: SpeakPurpose,
        result: Result<SpeakSuccess>,
    },
    Auth {
        signup: bool,
        result: Result<(String, UserRecord)>,
    },
    /// Session restoration; an error means the cached token is stale
    Restore(Result<UserRecord>),
    Saved(Result<Vec<SavedFileRecord>>),
    Upload(Result<UploadMeta>),
    VoiceCheck {
        voice_value: String,
        result: Result<bool>,
    },
}

/// Spawns jobs and hands their outcomes to the channel
pub struct JobRunner {
    tx: Sender<JobOutcome>,
}

/// Create a runner and the receiving end the event loop drains
pub fn runner() -> (JobRunner, Receiver<JobOutcome>) {
    let (tx, rx) = channel();
    (JobRunner { tx }, rx)
}

impl JobRunner {
    fn spawn<F>(&self, name: &'static str, job: F)
    where
        F: FnOnce() -> JobOutcome + Send + 'static,
    {
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!("Job started: {}", name);
            if tx.send(job()).is_err() {
                warn!("Job {} finished after the event loop exited", name);
            }
        });
    }

    pub fn fetch_catalog(&self, client: ApiClient) {
        self.spawn("catalog", move || JobOutcome::Catalog(client.voices()));
    }

    pub fn speak(&self, client: ApiClient, request: SpeakRequest, purpose: SpeakPurpose) {
        self.spawn("speak", move || JobOutcome::Speak {
            purpose,
            result: client.speak(&request),
        });
    }

    pub fn login(&self, client: ApiClient, email: String, password: String) {
        self.spawn("login", move || JobOutcome::Auth {
            signup: false,
            result: client.login(&email, &password),
        });
    }

    pub fn register(&self, client: ApiClient, email: String, password: String, name: String) {
        self.spawn("register", move || JobOutcome::Auth {
            signup: true,
            result: client.register(&email, &password, &name),
        });
    }

    pub fn restore_session(&self, client: ApiClient) {
        self.spawn("restore", move || {
            JobOutcome::Restore(crate::session::validate(&client))
        });
    }

    pub fn fetch_saved(&self, client: ApiClient) {
        self.spawn("saved", move || JobOutcome::Saved(client.saved_files()));
    }

    pub fn upload(
        &self,
        client: ApiClient,
        audio: Vec<u8>,
        filename: String,
        title: String,
        tags: String,
    ) {
        self.spawn("upload", move || {
            JobOutcome::Upload(client.upload(audio, &filename, &title, &tags))
        });
    }

    pub fn validate_voice(&self, client: ApiClient, voice_value: String) {
        self.spawn("validate-voice", move || {
            let result = client.validate_voice(&voice_value);
            JobOutcome::VoiceCheck {
                voice_value,
                result,
            }
        });
    }
}
