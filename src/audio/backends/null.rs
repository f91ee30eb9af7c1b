//! Silent playback backend
//!
//! Used when no audio output device is available. Playback requests are
//! logged and dropped; everything else in the client keeps working.

use crate::audio::player::Player;
use crate::Result;
use log::debug;
use std::path::Path;

pub struct NullPlayer;

impl NullPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for NullPlayer {
    fn play(&mut self, audio: Vec<u8>) -> Result<()> {
        debug!("Null player: dropping {} bytes", audio.len());
        Ok(())
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        debug!("Null player: dropping playback of {:?}", path);
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
