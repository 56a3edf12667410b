use crate::hero::MoveInput;
use se_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub restart: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Input for one fixed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayInput {
    pub movement: MoveInput,
    pub restart: bool,
}

impl ReplayInput {
    /// Keyboard state for this step: every flagged key is held, R for restart.
    pub fn to_input_state(&self) -> InputState {
        let mut input = InputState::new();
        let keys = [
            (self.movement.left, Key::Left),
            (self.movement.right, Key::Right),
            (self.movement.up, Key::Up),
            (self.movement.down, Key::Down),
            (self.restart, Key::R),
        ];
        for (held, key) in keys {
            if held {
                input.key_down(key);
            }
        }
        input
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ReplayInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let input = ReplayInput {
                movement: MoveInput {
                    left: frame.left,
                    right: frame.right,
                    up: frame.up,
                    down: frame.down,
                },
                restart: frame.restart,
            };
            for _ in 0..frame.repeat.max(1) {
                out.push(input);
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_director::{Cue, MUSIC_GAME, SFX_HIT};
    use crate::config::GameConfig;
    use crate::sprite::ImageCatalog;
    use crate::state::GameState;
    use crate::world::GameWorld;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    const START_BUTTON: (f32, f32) = (400.0, 190.0);

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "se_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_replay(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    /// Start a seeded world from the menu and feed it every replay step.
    /// Returns the world, every cue raised and the state after each step.
    fn run(replay: &ReplaySequence, seed: u64) -> (GameWorld, Vec<Cue>, Vec<GameState>) {
        let mut world = GameWorld::new(
            GameConfig::default(),
            Arc::new(ImageCatalog::new()),
            StdRng::seed_from_u64(seed),
        );
        let mut cues = world.click(START_BUTTON.0, START_BUTTON.1).cues;
        let mut states = Vec::new();
        for input in replay.expanded_inputs() {
            cues.extend(world.update(replay.fixed_dt, &input.to_input_state()));
            states.push(world.state);
        }
        (world, cues, states)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = write_replay(
            "parse",
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 3 },
                { "left": true, "up": true },
                { "restart": true }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].movement.right);
        assert!(expanded[3].movement.left && expanded[3].movement.up);
        assert!(expanded[4].restart);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn input_state_holds_flagged_keys() {
        let input = ReplayInput {
            movement: MoveInput {
                left: true,
                down: true,
                ..MoveInput::default()
            },
            restart: true,
        }
        .to_input_state();
        assert!(input.is_held(Key::Left));
        assert!(input.is_held(Key::Down));
        assert!(input.is_held(Key::R));
        assert!(!input.is_held(Key::Right));
        assert!(!input.is_held(Key::Up));
    }

    #[test]
    fn caught_then_restart_starts_a_fresh_run() {
        // The hero walks right along the first cake's row until caught,
        // then holds R for one step.
        let replay = write_replay(
            "restart",
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 300 },
                { "restart": true }
              ]
            }"#,
        );
        let (world, cues, states) = run(&replay, 7);

        assert!(states.contains(&GameState::Lose));
        assert_eq!(states[states.len() - 2], GameState::Lose);
        assert!(cues.contains(&Cue::Sfx(SFX_HIT)));
        assert_eq!(cues.last(), Some(&Cue::Music(MUSIC_GAME)));

        assert_eq!(world.state, GameState::Play);
        let session = world.session.as_ref().expect("fresh session");
        assert_eq!(session.collected, 0);
        assert_eq!(session.candies.len(), 20);
        assert_eq!(session.hero.sprite.pos.x, 120.0);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = write_replay(
            "deterministic",
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 60 },
                { "right": true, "down": true, "repeat": 30 },
                { "up": true, "repeat": 90 },
                { "left": true, "down": true, "repeat": 45 },
                { "restart": true, "repeat": 2 }
              ]
            }"#,
        );
        let (a, cues_a, states_a) = run(&replay, 2024);
        let (b, cues_b, states_b) = run(&replay, 2024);

        assert_eq!(states_a, states_b);
        assert_eq!(cues_a, cues_b);
        let (sa, sb) = (
            a.session.as_ref().expect("session"),
            b.session.as_ref().expect("session"),
        );
        assert_eq!(sa.collected, sb.collected);
        assert_eq!(sa.candies.len(), sb.candies.len());
        assert_eq!(sa.hero.sprite.pos, sb.hero.sprite.pos);
        for (ea, eb) in sa.enemies.iter().zip(&sb.enemies) {
            assert_eq!(ea.sprite.pos, eb.sprite.pos);
            assert_eq!(ea.direction, eb.direction);
        }
    }
}
