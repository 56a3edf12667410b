//! Software mixer shared between the game thread and the device callback.
//!
//! One-shot effect voices overlap freely and are dropped once played out.
//! At most one music voice exists; it loops until replaced or stopped.

use std::sync::Arc;

use crate::clip::Clip;

/// Effects beyond this many simultaneous voices steal the oldest.
const MAX_VOICES: usize = 16;

struct Voice {
    clip: Arc<Clip>,
    frame: usize,
}

struct MusicVoice {
    name: String,
    clip: Arc<Clip>,
    frame: usize,
    volume: f32,
}

pub struct Mixer {
    voices: Vec<Voice>,
    music: Option<MusicVoice>,
    pub master_volume: f32,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            music: None,
            master_volume: 1.0,
        }
    }

    pub fn play(&mut self, clip: Arc<Clip>) {
        if clip.is_empty() {
            return;
        }
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(Voice { clip, frame: 0 });
    }

    pub fn set_music(&mut self, name: &str, clip: Arc<Clip>, volume: f32) {
        self.music = Some(MusicVoice {
            name: name.to_string(),
            clip,
            frame: 0,
            volume: volume.clamp(0.0, 1.0),
        });
    }

    pub fn stop_music(&mut self) {
        self.music = None;
    }

    pub fn music_name(&self) -> Option<&str> {
        self.music.as_ref().map(|m| m.name.as_str())
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Fill an interleaved output buffer with `channels` channels.
    /// Mono output gets the average of left and right; channels past the
    /// second get silence.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let master = self.master_volume;

        for frame in out.chunks_mut(channels) {
            let (mut left, mut right) = (0.0f32, 0.0f32);

            for voice in &mut self.voices {
                if voice.frame < voice.clip.frames() {
                    left += voice.clip.samples[voice.frame * 2];
                    right += voice.clip.samples[voice.frame * 2 + 1];
                    voice.frame += 1;
                }
            }

            if let Some(music) = &mut self.music {
                let len = music.clip.frames();
                if len > 0 {
                    left += music.clip.samples[music.frame * 2] * music.volume;
                    right += music.clip.samples[music.frame * 2 + 1] * music.volume;
                    music.frame = (music.frame + 1) % len;
                }
            }

            left = (left * master).clamp(-1.0, 1.0);
            right = (right * master).clamp(-1.0, 1.0);

            if channels == 1 {
                frame[0] = (left + right) * 0.5;
            } else {
                for (i, sample) in frame.iter_mut().enumerate() {
                    *sample = match i {
                        0 => left,
                        1 => right,
                        _ => 0.0,
                    };
                }
            }
        }

        self.voices.retain(|v| v.frame < v.clip.frames());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(frames: &[(f32, f32)]) -> Arc<Clip> {
        Arc::new(Clip {
            samples: frames.iter().flat_map(|(l, r)| [*l, *r]).collect(),
            sample_rate: 44100,
        })
    }

    #[test]
    fn silent_mixer_outputs_zeros() {
        let mut mixer = Mixer::new();
        let mut out = [1.0f32; 8];
        mixer.render(&mut out, 2);
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn one_shot_plays_once_then_is_dropped() {
        let mut mixer = Mixer::new();
        mixer.play(clip(&[(0.5, 0.25), (0.5, 0.25)]));

        let mut out = [0.0f32; 6];
        mixer.render(&mut out, 2);
        assert_eq!(out, [0.5, 0.25, 0.5, 0.25, 0.0, 0.0]);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn overlapping_effects_are_summed_and_clamped() {
        let mut mixer = Mixer::new();
        mixer.play(clip(&[(0.75, -0.75)]));
        mixer.play(clip(&[(0.75, -0.75)]));

        let mut out = [0.0f32; 2];
        mixer.render(&mut out, 2);
        assert_eq!(out, [1.0, -1.0]);
    }

    #[test]
    fn music_loops_at_volume() {
        let mut mixer = Mixer::new();
        mixer.set_music("bgm", clip(&[(1.0, 1.0), (0.0, 0.0)]), 0.5);

        let mut out = [0.0f32; 8];
        mixer.render(&mut out, 2);
        assert_eq!(out, [0.5, 0.5, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0]);
        assert_eq!(mixer.music_name(), Some("bgm"));
    }

    #[test]
    fn replacing_music_restarts_from_the_top() {
        let mut mixer = Mixer::new();
        mixer.set_music("menu", clip(&[(0.25, 0.25), (0.0, 0.0)]), 1.0);
        let mut out = [0.0f32; 2];
        mixer.render(&mut out, 2);

        mixer.set_music("win", clip(&[(0.5, 0.5), (0.0, 0.0)]), 1.0);
        mixer.render(&mut out, 2);
        assert_eq!(out, [0.5, 0.5]);
        assert_eq!(mixer.music_name(), Some("win"));
    }

    #[test]
    fn stop_music_silences_output() {
        let mut mixer = Mixer::new();
        mixer.set_music("bgm", clip(&[(1.0, 1.0)]), 1.0);
        mixer.stop_music();
        let mut out = [0.5f32; 4];
        mixer.render(&mut out, 2);
        assert!(out.iter().all(|s| *s == 0.0));
        assert_eq!(mixer.music_name(), None);
    }

    #[test]
    fn mono_output_averages_channels() {
        let mut mixer = Mixer::new();
        mixer.play(clip(&[(0.5, 0.25)]));
        let mut out = [0.0f32; 1];
        mixer.render(&mut out, 1);
        assert_eq!(out, [0.375]);
    }

    #[test]
    fn voice_limit_steals_oldest() {
        let mut mixer = Mixer::new();
        for _ in 0..(MAX_VOICES + 3) {
            mixer.play(clip(&[(0.0, 0.0), (0.0, 0.0)]));
        }
        assert_eq!(mixer.active_voices(), MAX_VOICES);
    }
}
