//! `AudioService` backends: a cpal output stream driving the software mixer,
//! and a silent fallback for machines without an output device.

pub mod clip;
pub mod mixer;

use std::path::Path;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use se_core::audio::{AudioError, AudioService};

use crate::clip::{ClipCache, ClipKind};
use crate::mixer::Mixer;

pub struct CpalAudio {
    mixer: Arc<Mutex<Mixer>>,
    clips: ClipCache,
    // Dropping the stream stops playback.
    _stream: cpal::Stream,
}

impl CpalAudio {
    /// Open the default output device. Clips load from `asset_root`.
    pub fn open(asset_root: &Path) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "No default output device".to_string())?;
        let supported = device
            .default_output_config()
            .map_err(|e| format!("Failed to query output config: {e}"))?;
        let config: cpal::StreamConfig = supported.config();
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0;

        let mixer = Arc::new(Mutex::new(Mixer::new()));
        let callback_mixer = Arc::clone(&mixer);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    match callback_mixer.lock() {
                        Ok(mut mixer) => mixer.render(data, channels),
                        Err(_) => data.fill(0.0),
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build output stream: {e}"))?;
        stream
            .play()
            .map_err(|e| format!("Failed to start output stream: {e}"))?;

        log::info!(
            "Audio output: {} ({} Hz, {} ch)",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            channels
        );

        Ok(Self {
            mixer,
            clips: ClipCache::new(asset_root, sample_rate),
            _stream: stream,
        })
    }

    fn with_mixer(&self, f: impl FnOnce(&mut Mixer)) -> Result<(), AudioError> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| AudioError::Device("mixer lock poisoned".to_string()))?;
        f(&mut mixer);
        Ok(())
    }
}

impl AudioService for CpalAudio {
    fn play_sound(&mut self, name: &str) -> Result<(), AudioError> {
        let clip = self.clips.get(ClipKind::Sound, name)?;
        self.with_mixer(|m| m.play(clip))
    }

    fn play_music(&mut self, name: &str, volume: f32) -> Result<(), AudioError> {
        let clip = self.clips.get(ClipKind::Music, name)?;
        self.with_mixer(|m| m.set_music(name, clip, volume))
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        self.with_mixer(Mixer::stop_music)
    }
}

/// Backend used when no output device could be opened. Every call reports
/// the original device failure.
pub struct SilentAudio {
    reason: String,
}

impl SilentAudio {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AudioService for SilentAudio {
    fn play_sound(&mut self, _name: &str) -> Result<(), AudioError> {
        Err(AudioError::Device(self.reason.clone()))
    }

    fn play_music(&mut self, _name: &str, _volume: f32) -> Result<(), AudioError> {
        Err(AudioError::Device(self.reason.clone()))
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Device(self.reason.clone()))
    }
}

/// Open the device backend, falling back to silence on failure.
pub fn open_audio(asset_root: &Path) -> Box<dyn AudioService> {
    match CpalAudio::open(asset_root) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            log::warn!("Audio disabled: {}", e);
            Box::new(SilentAudio::new(e))
        }
    }
}
