//! Configuration management

use crate::{Result, TtscError};
use ini::Ini;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

/// Server base URL taken from the environment, when set
///
/// `TTSC_API_BASE` wins over the config file so one shell can point at a
/// different server without editing `~/.ttsc.cfg`.
static ENV_API_BASE: Lazy<Option<String>> = Lazy::new(|| {
    std::env::var("TTSC_API_BASE")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
});

/// Default server for the demo deployment
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Parameter ranges the server's sliders expose
pub const PITCH_RANGE: (f32, f32) = (-2.0, 2.0);
pub const RATE_RANGE: (f32, f32) = (0.5, 2.0);
pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.5);

/// Application configuration for the studio client
///
/// Manages all persistent settings: the server endpoint, speech parameter
/// defaults, catalog display caps, and where client-side state (token,
/// history, clips) lives.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.ttsc.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location or create it
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| TtscError::Config(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| TtscError::Config(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| TtscError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.ttsc.cfg)
    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".ttsc.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("api"))
            .set("base_url", DEFAULT_API_BASE)
            .set("timeout_secs", "30");

        ini.with_section(Some("speech"))
            .set("pitch", "0.0")
            .set("rate", "1.0")
            .set("volume", "1.0")
            .set("autoplay", "true");

        ini.with_section(Some("catalog"))
            .set("voices_per_group", "50");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Client-specific configuration getters

    /// Server base URL; `TTSC_API_BASE` overrides the config file
    pub fn base_url(&self) -> String {
        if let Some(env) = ENV_API_BASE.as_ref() {
            return env.clone();
        }
        self.get_string("api", "base_url", DEFAULT_API_BASE)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        let secs = self.get_int("api", "timeout_secs", 30).max(1) as u64;
        Duration::from_secs(secs)
    }

    /// Default pitch offset (-2.0 to 2.0)
    pub fn pitch(&self) -> f32 {
        clamp_param(self.get_float("speech", "pitch", 0.0), PITCH_RANGE)
    }

    /// Default speech rate (0.5 to 2.0)
    pub fn rate(&self) -> f32 {
        clamp_param(self.get_float("speech", "rate", 1.0), RATE_RANGE)
    }

    /// Default volume (0.0 to 1.5)
    pub fn volume(&self) -> f32 {
        clamp_param(self.get_float("speech", "volume", 1.0), VOLUME_RANGE)
    }

    /// Should generated speech start playing as soon as it arrives?
    pub fn autoplay(&self) -> bool {
        self.get_bool("speech", "autoplay", true)
    }

    /// Cap on voices shown per language group
    pub fn voices_per_group(&self) -> usize {
        self.get_int("catalog", "voices_per_group", 50).max(1) as usize
    }

    /// Directory for client-persisted state (~/.ttsc)
    ///
    /// Token cache, session history and audio clips all live under here.
    pub fn data_dir(&self) -> PathBuf {
        let configured = self.get_string("storage", "data_dir", "");
        if !configured.is_empty() {
            return PathBuf::from(configured);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ttsc")
    }

    /// Session history cache file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join("history.json")
    }

    /// Bearer token cache file
    pub fn token_path(&self) -> PathBuf {
        self.data_dir().join("token")
    }

    /// Directory for session-scoped audio clips
    pub fn clips_dir(&self) -> PathBuf {
        self.data_dir().join("clips")
    }
}

/// Clamp a speech parameter into its slider range
pub fn clamp_param(value: f32, range: (f32, f32)) -> f32 {
    value.clamp(range.0, range.1)
}
