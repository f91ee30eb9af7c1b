//! Audio playback abstraction
//!
//! Playback goes to the default output device when one is available; in
//! headless environments (CI, servers) a silent backend keeps the client
//! usable — clips can still be generated, saved and uploaded.

use crate::Result;
use log::info;

/// Audio playback backend
pub trait Player {
    /// Start playing a clip from its raw bytes, replacing anything playing
    fn play(&mut self, audio: Vec<u8>) -> Result<()>;

    /// Play a stored clip file
    fn play_file(&mut self, path: &std::path::Path) -> Result<()>;

    /// Stop playback
    fn stop(&mut self);

    /// Is something still playing?
    fn is_playing(&self) -> bool;

    /// Backend name for status display
    fn name(&self) -> &'static str;
}

/// Create the best available playback backend
///
/// Tries the default audio device first; falls back to the silent backend
/// when no device is available.
pub fn create_player() -> Box<dyn Player> {
    use super::backends::device::DevicePlayer;
    use super::backends::null::NullPlayer;

    match DevicePlayer::new() {
        Ok(player) => {
            info!("Audio output initialized");
            Box::new(player)
        }
        Err(e) => {
            info!("No audio output device ({}), playback disabled", e);
            Box::new(NullPlayer::new())
        }
    }
}
