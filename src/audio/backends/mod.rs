//! Playback backend implementations

pub mod device;
pub mod null;
