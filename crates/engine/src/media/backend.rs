use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::asset_refs::resolve_asset_path;

use super::{AudioChannel, MediaBackend, MediaError, PlaybackCue};

/// Resolves cues against the asset root and reports playback through tracing.
/// A cue whose file is absent fails with [`MediaError::AssetMissing`].
#[derive(Debug, Clone)]
pub struct LoggingMediaBackend {
    asset_root: PathBuf,
}

impl LoggingMediaBackend {
    pub fn new(asset_root: PathBuf) -> Self {
        Self { asset_root }
    }
}

impl MediaBackend for LoggingMediaBackend {
    fn play(&mut self, channel: AudioChannel, cue: &PlaybackCue) -> Result<(), MediaError> {
        let path = resolve_asset_path(&self.asset_root, &cue.asset)?;
        if !path.is_file() {
            return Err(MediaError::AssetMissing { path });
        }
        info!(
            channel = %channel,
            asset = %cue.asset,
            path = %path.display(),
            volume = cue.volume,
            looping = cue.looping,
            "media_play"
        );
        Ok(())
    }

    fn stop(&mut self, channel: AudioChannel) {
        info!(channel = %channel, "media_stopped");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Played {
        channel: AudioChannel,
        cue: PlaybackCue,
    },
    Refused {
        channel: AudioChannel,
        asset: String,
    },
    Stopped {
        channel: AudioChannel,
    },
}

static MEDIA_LOG_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_media_log_poison_once(operation: &'static str) {
    if MEDIA_LOG_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "media log lock poisoned; recovered inner value");
    }
}

/// Shared, clonable record of everything a [`RecordingMediaBackend`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct MediaLog {
    events: Arc<Mutex<Vec<MediaEvent>>>,
}

impl MediaLog {
    pub fn events(&self) -> Vec<MediaEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn_media_log_poison_once("read");
                poisoned.into_inner().clone()
            }
        }
    }

    pub fn played_cues(&self) -> Vec<(AudioChannel, PlaybackCue)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MediaEvent::Played { channel, cue } => Some((channel, cue)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => {
                warn_media_log_poison_once("clear");
                poisoned.into_inner().clear();
            }
        }
    }

    fn push(&self, event: MediaEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => {
                warn_media_log_poison_once("write");
                poisoned.into_inner().push(event);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordingMediaBackend {
    log: MediaLog,
    refuse_playback: bool,
}

impl RecordingMediaBackend {
    pub fn new(log: MediaLog) -> Self {
        Self {
            log,
            refuse_playback: false,
        }
    }

    /// Every `play` fails, the way a platform blocks autoplay.
    pub fn refusing_playback(mut self) -> Self {
        self.refuse_playback = true;
        self
    }
}

impl MediaBackend for RecordingMediaBackend {
    fn play(&mut self, channel: AudioChannel, cue: &PlaybackCue) -> Result<(), MediaError> {
        if self.refuse_playback {
            self.log.push(MediaEvent::Refused {
                channel,
                asset: cue.asset.clone(),
            });
            return Err(MediaError::Refused {
                reason: "autoplay blocked".to_string(),
            });
        }
        self.log.push(MediaEvent::Played {
            channel,
            cue: cue.clone(),
        });
        Ok(())
    }

    fn stop(&mut self, channel: AudioChannel) {
        self.log.push(MediaEvent::Stopped { channel });
    }
}
