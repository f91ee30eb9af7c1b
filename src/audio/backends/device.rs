//! Default-device playback backend
//!
//! Decodes and plays MP3 clips through the system's default output device.
//! Playback is detached: `play` returns once the clip is queued on the sink.

use crate::audio::player::Player;
use crate::{Result, TtscError};
use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub struct DevicePlayer {
    // The stream must stay alive for the sink to keep playing
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl DevicePlayer {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| TtscError::Audio(format!("Failed to open output device: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }

    fn start(&mut self, audio: Vec<u8>) -> Result<()> {
        // Replace whatever is currently playing
        self.stop();

        let source = Decoder::new(Cursor::new(audio))
            .map_err(|e| TtscError::Audio(format!("Failed to decode audio: {}", e)))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| TtscError::Audio(format!("Failed to open playback sink: {}", e)))?;
        sink.append(source);
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }
}

impl Player for DevicePlayer {
    fn play(&mut self, audio: Vec<u8>) -> Result<()> {
        debug!("Playing {} bytes", audio.len());
        self.start(audio)
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        debug!("Playing {:?}", path);
        let audio = fs::read(path)
            .map_err(|_| TtscError::Audio("Audio clip is no longer available".to_string()))?;
        self.start(audio)
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn name(&self) -> &'static str {
        "device"
    }
}
