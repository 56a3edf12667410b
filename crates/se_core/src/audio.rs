//! Audio service seam.
//!
//! Game code talks to sound through `AudioService` and receives an explicit
//! `AudioError` on failure. Callers on the frame path log the error and skip
//! the cue.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No asset with this name exists on disk.
    MissingAsset(String),
    /// The asset exists but could not be decoded.
    Decode { name: String, reason: String },
    /// No usable output device, or the device stream failed.
    Device(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAsset(name) => write!(f, "audio asset '{}' not found", name),
            Self::Decode { name, reason } => {
                write!(f, "audio asset '{}' could not be decoded: {}", name, reason)
            }
            Self::Device(reason) => write!(f, "audio device unavailable: {}", reason),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait AudioService {
    /// Start a one-shot sound effect. Overlapping effects are allowed.
    fn play_sound(&mut self, name: &str) -> Result<(), AudioError>;

    /// Replace the current music with a looping track at `volume` (0..=1).
    fn play_music(&mut self, name: &str, volume: f32) -> Result<(), AudioError>;

    fn stop_music(&mut self) -> Result<(), AudioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_asset() {
        let err = AudioError::MissingAsset("pickup".to_string());
        assert_eq!(err.to_string(), "audio asset 'pickup' not found");

        let err = AudioError::Decode {
            name: "bgm".to_string(),
            reason: "bad header".to_string(),
        };
        assert!(err.to_string().contains("bgm"));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn device_error_mentions_device() {
        let err = AudioError::Device("no output device".to_string());
        assert!(err.to_string().starts_with("audio device unavailable"));
    }
}
