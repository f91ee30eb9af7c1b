//! Clip store for synthesized audio
//!
//! Server audio bytes are written to files in a session-scoped directory and
//! referenced by lightweight handles. Handles are transient: the directory
//! is swept on startup, so a clip path loaded from an old session history
//! may no longer exist.
//!
//! Release is a manual discipline: the owner of a handle releases it before
//! replacing it. Releasing a clip whose file is already gone is not an
//! error.

use crate::{Result, TtscError};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Handle to one locally stored clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    path: PathBuf,
}

impl AudioClip {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Session-scoped store of clip files
pub struct AudioStore {
    dir: PathBuf,
    /// Disambiguates clips created within the same millisecond
    seq: u64,
}

impl AudioStore {
    /// Open the store, sweeping clips left over from a previous session
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;

        let mut swept = 0usize;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "mp3") {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to sweep stale clip {:?}: {}", path, e);
                } else {
                    swept += 1;
                }
            }
        }
        if swept > 0 {
            info!("Swept {} stale clips from {:?}", swept, dir);
        }

        Ok(Self { dir, seq: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write audio bytes to a new clip file
    pub fn store(&mut self, audio: &[u8]) -> Result<AudioClip> {
        if audio.is_empty() {
            return Err(TtscError::Audio("Refusing to store empty audio".to_string()));
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.seq += 1;
        let path = self.dir.join(format!("speech_{}_{}.mp3", millis, self.seq));

        fs::write(&path, audio)?;
        debug!("Stored {} bytes at {:?}", audio.len(), path);
        Ok(AudioClip { path })
    }

    /// Release a clip, removing its file
    ///
    /// A missing file is fine — the clip may have been swept or released
    /// through another handle.
    pub fn release(&self, clip: &AudioClip) -> Result<()> {
        self.release_path(clip.path())
    }

    /// Release by path (history entries store paths, not handles)
    pub fn release_path(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Released clip {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Release the clip in `slot`, if any, leaving the slot empty
    pub fn release_slot(&self, slot: &mut Option<AudioClip>) -> Result<()> {
        if let Some(clip) = slot.take() {
            self.release(&clip)?;
        }
        Ok(())
    }

    /// Copy a clip out of the store, e.g. as a download
    pub fn export(&self, clip_path: &Path, dest: &Path) -> Result<()> {
        if !clip_path.exists() {
            return Err(TtscError::Audio(
                "Audio clip is no longer available".to_string(),
            ));
        }
        fs::copy(clip_path, dest)?;
        info!("Exported clip to {:?}", dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, AudioStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::open(dir.path().join("clips")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_store_and_release() {
        let (_tmp, mut store) = store();
        let clip = store.store(b"abc").unwrap();
        assert!(clip.path().exists());

        store.release(&clip).unwrap();
        assert!(!clip.path().exists());
    }

    #[test]
    fn test_double_release_is_ok() {
        let (_tmp, mut store) = store();
        let clip = store.store(b"abc").unwrap();
        store.release(&clip).unwrap();
        // Second release of the same handle must not error
        store.release(&clip).unwrap();
    }

    #[test]
    fn test_release_slot_replacement() {
        let (_tmp, mut store) = store();
        let first = store.store(b"one").unwrap();
        let mut slot = Some(first.clone());

        // Releasing before replacing leaves no file behind
        store.release_slot(&mut slot).unwrap();
        assert!(slot.is_none());
        assert!(!first.path().exists());

        slot = Some(store.store(b"two").unwrap());
        assert!(slot.as_ref().unwrap().path().exists());
    }

    #[test]
    fn test_open_sweeps_stale_clips() {
        let dir = tempfile::tempdir().unwrap();
        let clips = dir.path().join("clips");
        std::fs::create_dir_all(&clips).unwrap();
        std::fs::write(clips.join("speech_1_1.mp3"), b"stale").unwrap();
        std::fs::write(clips.join("notes.txt"), b"kept").unwrap();

        let _store = AudioStore::open(clips.clone()).unwrap();
        assert!(!clips.join("speech_1_1.mp3").exists());
        assert!(clips.join("notes.txt").exists());
    }

    #[test]
    fn test_rejects_empty_audio() {
        let (_tmp, mut store) = store();
        assert!(store.store(b"").is_err());
    }
}
