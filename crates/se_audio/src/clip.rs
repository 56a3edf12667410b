//! Decoded PCM clips and the on-disk clip cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use se_core::audio::AudioError;

/// Interleaved stereo samples at the output sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Clip {
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() < 2
    }

    /// Linear-interpolated conversion to `target_rate`.
    pub fn resampled(self, target_rate: u32) -> Clip {
        if self.sample_rate == target_rate || self.is_empty() || target_rate == 0 {
            return self;
        }
        let src_frames = self.frames();
        let ratio = self.sample_rate as f64 / target_rate as f64;
        let dst_frames = ((src_frames as f64) / ratio).floor().max(1.0) as usize;
        let mut samples = Vec::with_capacity(dst_frames * 2);
        for i in 0..dst_frames {
            let pos = i as f64 * ratio;
            let base = (pos.floor() as usize).min(src_frames - 1);
            let next = (base + 1).min(src_frames - 1);
            let t = (pos - base as f64) as f32;
            for ch in 0..2 {
                let a = self.samples[base * 2 + ch];
                let b = self.samples[next * 2 + ch];
                samples.push(a + (b - a) * t);
            }
        }
        Clip {
            samples,
            sample_rate: target_rate,
        }
    }
}

/// Decode a WAV file into a stereo clip. Mono is duplicated; extra channels
/// beyond the first two are dropped.
pub fn load_wav(path: &Path) -> Result<Clip, String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let mono_or_multi: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?
        }
    };

    let mut samples = Vec::with_capacity(mono_or_multi.len() / channels * 2);
    for frame in mono_or_multi.chunks_exact(channels) {
        let left = frame[0];
        let right = if channels > 1 { frame[1] } else { frame[0] };
        samples.push(left);
        samples.push(right);
    }

    Ok(Clip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKind {
    Sound,
    Music,
}

impl ClipKind {
    fn dir(self) -> &'static str {
        match self {
            Self::Sound => "sounds",
            Self::Music => "music",
        }
    }
}

/// Lazily loads `<root>/sounds/<name>.wav` and `<root>/music/<name>.wav`,
/// converted to the output rate. Failed loads are not cached.
pub struct ClipCache {
    root: PathBuf,
    output_rate: u32,
    clips: HashMap<(ClipKind, String), Arc<Clip>>,
}

impl ClipCache {
    pub fn new(root: impl Into<PathBuf>, output_rate: u32) -> Self {
        let root = root.into();
        for kind in [ClipKind::Sound, ClipKind::Music] {
            let dir = root.join(kind.dir());
            if !dir.is_dir() {
                log::warn!("Audio directory {} not found", dir.display());
            }
        }
        Self {
            root,
            output_rate,
            clips: HashMap::new(),
        }
    }

    pub fn path_for(&self, kind: ClipKind, name: &str) -> PathBuf {
        self.root.join(kind.dir()).join(format!("{}.wav", name))
    }

    pub fn get(&mut self, kind: ClipKind, name: &str) -> Result<Arc<Clip>, AudioError> {
        if let Some(clip) = self.clips.get(&(kind, name.to_string())) {
            return Ok(Arc::clone(clip));
        }

        let path = self.path_for(kind, name);
        if !path.is_file() {
            return Err(AudioError::MissingAsset(name.to_string()));
        }
        let clip = load_wav(&path).map_err(|reason| AudioError::Decode {
            name: name.to_string(),
            reason,
        })?;
        let clip = Arc::new(clip.resampled(self.output_rate));
        log::info!(
            "Loaded {:?} '{}' ({} frames)",
            kind,
            name,
            clip.frames()
        );
        self.clips.insert((kind, name.to_string()), Arc::clone(&clip));
        Ok(clip)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
