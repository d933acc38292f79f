//! Fire-and-forget audio for scene entry.
//!
//! Two independent channels sit in front of a [`MediaBackend`]: a looping
//! ambient channel and a one-shot effect channel. Backend failures stop at the
//! channel handle and never reach the navigator.

mod backend;
mod channel;
#[cfg(feature = "audio")]
mod rodio_backend;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset_refs::AssetRefError;

pub use backend::{LoggingMediaBackend, MediaEvent, MediaLog, RecordingMediaBackend};
pub use channel::{ChannelHandle, MediaDeck, AMBIENT_VOLUME, EFFECT_VOLUME};
#[cfg(feature = "audio")]
pub use rodio_backend::RodioMediaBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    Ambient,
    Effect,
}

impl AudioChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            AudioChannel::Ambient => "ambient",
            AudioChannel::Effect => "effect",
        }
    }
}

impl fmt::Display for AudioChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackCue {
    pub asset: String,
    pub volume: f32,
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("invalid asset reference: {0}")]
    InvalidRef(#[from] AssetRefError),
    #[error("asset file not found: {path}")]
    AssetMissing { path: PathBuf },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("audio output unavailable: {reason}")]
    Device { reason: String },
    #[error("playback refused: {reason}")]
    Refused { reason: String },
}

pub trait MediaBackend {
    fn play(&mut self, channel: AudioChannel, cue: &PlaybackCue) -> Result<(), MediaError>;
    fn stop(&mut self, channel: AudioChannel);
}
