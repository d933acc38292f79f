use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::info;

use crate::asset_refs::resolve_asset_path;

use super::{AudioChannel, MediaBackend, MediaError, PlaybackCue};

/// Plays cues on the default audio output device, one sink per channel.
/// Dropping the backend silences everything.
pub struct RodioMediaBackend {
    asset_root: PathBuf,
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sinks: HashMap<AudioChannel, Sink>,
}

impl RodioMediaBackend {
    pub fn open(asset_root: PathBuf) -> Result<Self, MediaError> {
        let (stream, handle) = OutputStream::try_default().map_err(|error| MediaError::Device {
            reason: error.to_string(),
        })?;
        Ok(Self {
            asset_root,
            _stream: stream,
            handle,
            sinks: HashMap::new(),
        })
    }
}

impl MediaBackend for RodioMediaBackend {
    fn play(&mut self, channel: AudioChannel, cue: &PlaybackCue) -> Result<(), MediaError> {
        let path = resolve_asset_path(&self.asset_root, &cue.asset)?;
        let file = File::open(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => MediaError::AssetMissing { path: path.clone() },
            _ => MediaError::Decode {
                path: path.clone(),
                reason: error.to_string(),
            },
        })?;
        let decode_error = |error: rodio::decoder::DecoderError| MediaError::Decode {
            path: path.clone(),
            reason: error.to_string(),
        };

        let sink = Sink::try_new(&self.handle).map_err(|error| MediaError::Device {
            reason: error.to_string(),
        })?;
        sink.set_volume(cue.volume);
        if cue.looping {
            sink.append(Decoder::new_looped(BufReader::new(file)).map_err(decode_error)?);
        } else {
            sink.append(Decoder::new(BufReader::new(file)).map_err(decode_error)?);
        }

        if let Some(previous) = self.sinks.insert(channel, sink) {
            previous.stop();
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
        if let Some(sink) = self.sinks.remove(&channel) {
            sink.stop();
        }
        info!(channel = %channel, "media_stopped");
    }
}
