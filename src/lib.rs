//! ttsc - Console text-to-speech studio client
//!
//! An interactive terminal client for a multilingual text-to-speech server.
//! Lets a user pick a language/gender/voice, submit text, preview and save
//! synthesized audio, keep a local session history, and optionally sign in
//! to persist generated clips server-side.

pub mod api;
pub mod audio;
pub mod catalog;
pub mod clipboard;
pub mod error;
pub mod history;
pub mod input;
pub mod jobs;
pub mod notify;
pub mod platform;
pub mod session;
pub mod state;
pub mod term;
pub mod view;

pub use error::{Result, TtscError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "ttsc";
