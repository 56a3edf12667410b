//! Turns rule-produced cues into `AudioService` calls.
//!
//! Game rules never touch the backend directly; they return `Cue` lists and
//! the frame driver hands them here after the step. Failures are logged at
//! debug and otherwise ignored.

use se_core::audio::AudioService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Sfx(&'static str),
    Music(&'static str),
    StopMusic,
}

pub const SFX_STEP: &str = "step";
pub const SFX_HIT: &str = "hit";
pub const SFX_PICKUP: &str = "pickup";
pub const SFX_WIN: &str = "win";

pub const MUSIC_MENU: &str = "menu";
pub const MUSIC_GAME: &str = "bgm";
pub const MUSIC_WIN: &str = "win";

#[derive(Debug)]
pub struct AudioDirector {
    music_now: Option<String>,
    pub music_volume: f32,
}

impl AudioDirector {
    pub fn new(music_volume: f32) -> Self {
        Self {
            music_now: None,
            music_volume,
        }
    }

    /// Track the backend is believed to be playing.
    pub fn music_now(&self) -> Option<&str> {
        self.music_now.as_deref()
    }

    pub fn dispatch(&mut self, cues: &[Cue], sound_on: bool, audio: &mut dyn AudioService) {
        for cue in cues {
            match cue {
                Cue::Sfx(name) => {
                    if !sound_on {
                        continue;
                    }
                    if let Err(e) = audio.play_sound(name) {
                        log::debug!("Sound '{}' skipped: {}", name, e);
                    }
                }
                Cue::Music(track) => self.play_music(track, sound_on, audio),
                Cue::StopMusic => {
                    if let Err(e) = audio.stop_music() {
                        log::debug!("Stop music failed: {}", e);
                    }
                    self.music_now = None;
                }
            }
        }
    }

    fn play_music(&mut self, track: &str, sound_on: bool, audio: &mut dyn AudioService) {
        if !sound_on || self.music_now.as_deref() == Some(track) {
            return;
        }
        if let Err(e) = audio.stop_music() {
            log::debug!("Stop music failed: {}", e);
        }
        match audio.play_music(track, self.music_volume) {
            Ok(()) => self.music_now = Some(track.to_string()),
            Err(e) => {
                log::debug!("Music '{}' skipped: {}", track, e);
                self.music_now = None;
            }
        }
    }
}

/// Fake backend that records every call, for tests across the crate.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingAudio {
    pub calls: Vec<String>,
    pub missing: Vec<&'static str>,
}

#[cfg(test)]
impl AudioService for RecordingAudio {
    fn play_sound(&mut self, name: &str) -> Result<(), se_core::audio::AudioError> {
        if self.missing.iter().any(|m| *m == name) {
            return Err(se_core::audio::AudioError::MissingAsset(name.to_string()));
        }
        self.calls.push(format!("sfx:{}", name));
        Ok(())
    }

    fn play_music(&mut self, name: &str, volume: f32) -> Result<(), se_core::audio::AudioError> {
        if self.missing.iter().any(|m| *m == name) {
            return Err(se_core::audio::AudioError::MissingAsset(name.to_string()));
        }
        self.calls.push(format!("music:{}@{}", name, volume));
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), se_core::audio::AudioError> {
        self.calls.push("stop".to_string());
        Ok(())
    }
}
