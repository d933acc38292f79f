use tracing::debug;

use super::{AudioChannel, MediaBackend, PlaybackCue};

pub const AMBIENT_VOLUME: f32 = 0.4;
pub const EFFECT_VOLUME: f32 = 0.7;

/// One playback channel. Starting a new asset implicitly replaces the previous
/// one; playback completion is never observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelHandle {
    channel: AudioChannel,
    volume: f32,
    looping: bool,
    last_started: Option<String>,
}

impl ChannelHandle {
    pub fn ambient() -> Self {
        Self {
            channel: AudioChannel::Ambient,
            volume: AMBIENT_VOLUME,
            looping: true,
            last_started: None,
        }
    }

    pub fn effect() -> Self {
        Self {
            channel: AudioChannel::Effect,
            volume: EFFECT_VOLUME,
            looping: false,
            last_started: None,
        }
    }

    pub fn channel(&self) -> AudioChannel {
        self.channel
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Asset most recently started on this channel, if it has not been stopped.
    pub fn last_started(&self) -> Option<&str> {
        self.last_started.as_deref()
    }

    /// Returns whether the backend accepted the asset. Failures are logged at
    /// debug level and dropped.
    pub fn play(&mut self, backend: &mut dyn MediaBackend, asset: &str) -> bool {
        self.stop(backend);
        let cue = PlaybackCue {
            asset: asset.to_string(),
            volume: self.volume,
            looping: self.looping,
        };
        match backend.play(self.channel, &cue) {
            Ok(()) => {
                self.last_started = Some(cue.asset);
                true
            }
            Err(error) => {
                debug!(
                    channel = %self.channel,
                    asset,
                    error = %error,
                    "media_play_failed"
                );
                false
            }
        }
    }

    pub fn stop(&mut self, backend: &mut dyn MediaBackend) {
        if self.last_started.take().is_some() {
            backend.stop(self.channel);
        }
    }
}

/// The ambient and effect channels bound to one backend.
pub struct MediaDeck {
    backend: Box<dyn MediaBackend>,
    ambient: ChannelHandle,
    effect: ChannelHandle,
}

impl MediaDeck {
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self {
            backend,
            ambient: ChannelHandle::ambient(),
            effect: ChannelHandle::effect(),
        }
    }

    pub fn play_ambient(&mut self, asset: &str) -> bool {
        self.ambient.play(self.backend.as_mut(), asset)
    }

    pub fn stop_ambient(&mut self) {
        self.ambient.stop(self.backend.as_mut());
    }

    pub fn play_effect(&mut self, asset: &str) -> bool {
        self.effect.play(self.backend.as_mut(), asset)
    }

    pub fn stop_all(&mut self) {
        self.ambient.stop(self.backend.as_mut());
        self.effect.stop(self.backend.as_mut());
    }

    pub fn ambient(&self) -> &ChannelHandle {
        &self.ambient
    }

    pub fn effect(&self) -> &ChannelHandle {
        &self.effect
    }
}
