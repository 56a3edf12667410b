//! Tunable game constants loaded from `assets/config/game.json`.
//!
//! Every field has a default, so an empty object (or a missing file) yields
//! the stock game. A changed file is picked up by `ConfigWatcher` and takes
//! effect at the next run start.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 450.0;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub hero: HeroConfig,
    pub enemies: EnemyList,
    pub session: SessionConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HeroConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub speed: f32,
    pub step_interval: f32,
    pub idle_fps: f32,
    pub move_fps: f32,
    pub idle_frames: Vec<String>,
    pub move_frames: Vec<String>,
    /// Hitbox used when the first idle image has no known size.
    pub fallback_size: [f32; 2],
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            start_x: 120.0,
            start_y: 225.0,
            speed: 220.0,
            step_interval: 0.22,
            idle_fps: 5.0,
            move_fps: 12.0,
            idle_frames: numbered("sweet_idle", 3),
            move_frames: numbered("sweet_run", 3),
            fallback_size: [48.0, 48.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    /// Image prefix: idle frames are `{prefix}_idle_{0,1}`, run frames
    /// `{prefix}_run_{0..run_frames}`.
    pub prefix: String,
    pub x: f32,
    pub y: f32,
    pub left_limit: f32,
    pub right_limit: f32,
    pub speed: f32,
    pub idle_fps: f32,
    pub move_fps: f32,
    pub run_frames: usize,
    pub fallback_size: [f32; 2],
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            prefix: "cake1".to_string(),
            x: 520.0,
            y: 225.0,
            left_limit: 420.0,
            right_limit: 740.0,
            speed: 140.0,
            idle_fps: 4.0,
            move_fps: 10.0,
            run_frames: 3,
            fallback_size: [48.0, 48.0],
        }
    }
}

impl EnemyConfig {
    pub fn idle_frames(&self) -> Vec<String> {
        numbered(&format!("{}_idle", self.prefix), 2)
    }

    pub fn move_frames(&self) -> Vec<String> {
        numbered(&format!("{}_run", self.prefix), self.run_frames)
    }
}

/// Newtype so a missing `enemies` key means "the two stock cakes" while an
/// explicit empty list stays empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct EnemyList(pub Vec<EnemyConfig>);

impl Default for EnemyList {
    fn default() -> Self {
        Self(vec![
            EnemyConfig::default(),
            EnemyConfig {
                prefix: "cake2".to_string(),
                y: 140.0,
                left_limit: 260.0,
                right_limit: 720.0,
                run_frames: 2,
                ..EnemyConfig::default()
            },
        ])
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub candy_target: u32,
    /// Candies spawn at integer positions in `[margin, dimension - margin]`.
    pub candy_margin: i32,
    /// Hero centre stays within `[padding, dimension - padding]`.
    pub padding: f32,
    pub goal_x: f32,
    pub goal_y: f32,
    pub candy_image: String,
    pub goal_image: String,
    pub candy_fallback_size: [f32; 2],
    pub goal_fallback_size: [f32; 2],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            candy_target: 20,
            candy_margin: 80,
            padding: 24.0,
            goal_x: SCREEN_WIDTH - 70.0,
            goal_y: 60.0,
            candy_image: "candy".to_string(),
            goal_image: "goal".to_string(),
            candy_fallback_size: [28.0, 28.0],
            goal_fallback_size: [56.0, 56.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub music_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { music_volume: 0.6 }
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}_{}", prefix, i)).collect()
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config at startup. A missing file means stock values; a broken
/// one is reported and also falls back to stock values.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::warn!("Config {} not found, using defaults", path.display());
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded config {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            GameConfig::default()
        }
    }
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let hero = &config.hero;
    if hero.speed <= 0.0 {
        return Err("Config validation failed: hero.speed must be > 0".to_string());
    }
    if hero.step_interval <= 0.0 {
        return Err("Config validation failed: hero.step_interval must be > 0".to_string());
    }
    if hero.idle_fps < 0.0 || hero.move_fps < 0.0 {
        return Err("Config validation failed: hero fps must be >= 0".to_string());
    }
    if hero.idle_frames.is_empty() || hero.move_frames.is_empty() {
        return Err("Config validation failed: hero frame lists must not be empty".to_string());
    }

    for enemy in &config.enemies.0 {
        if enemy.speed <= 0.0 {
            return Err(format!(
                "Config validation failed: enemy '{}' speed must be > 0",
                enemy.prefix
            ));
        }
        if enemy.idle_fps < 0.0 || enemy.move_fps < 0.0 {
            return Err(format!(
                "Config validation failed: enemy '{}' fps must be >= 0",
                enemy.prefix
            ));
        }
        if enemy.left_limit >= enemy.right_limit {
            return Err(format!(
                "Config validation failed: enemy '{}' left_limit must be < right_limit",
                enemy.prefix
            ));
        }
        if enemy.run_frames == 0 {
            return Err(format!(
                "Config validation failed: enemy '{}' needs at least one run frame",
                enemy.prefix
            ));
        }
    }

    let session = &config.session;
    if session.candy_target == 0 {
        return Err("Config validation failed: session.candy_target must be > 0".to_string());
    }
    if session.padding < 0.0
        || session.padding * 2.0 > SCREEN_WIDTH
        || session.padding * 2.0 > SCREEN_HEIGHT
    {
        return Err(
            "Config validation failed: session.padding must be >= 0 and fit inside the screen"
                .to_string(),
        );
    }
    let margin = session.candy_margin as f32;
    if session.candy_margin < 0 || margin * 2.0 >= SCREEN_WIDTH || margin * 2.0 >= SCREEN_HEIGHT {
        return Err(
            "Config validation failed: session.candy_margin must fit inside the screen".to_string(),
        );
    }

    if !(0.0..=1.0).contains(&config.audio.music_volume) {
        return Err("Config validation failed: audio.music_volume must be in [0, 1]".to_string());
    }
    Ok(())
}

/// Polls a file's modification time once per frame.
pub struct ConfigWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
