//! One playthrough: hero, enemies, candies, goal and the per-step rules.
//!
//! Rule order per step:
//!  1. hero moves from input
//!  2. every enemy patrols
//!  3. hero touching an enemy ends the run as `Caught`; nothing else runs
//!  4. every candy under the hero is collected (one pickup cue at most)
//!  5. the goal appears once enough candy is collected
//!  6. hero touching the goal ends the run as `GoalReached`

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use crate::audio_director::{Cue, SFX_HIT, SFX_PICKUP, SFX_STEP, SFX_WIN};
use crate::config::{GameConfig, SessionConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::enemy::Enemy;
use crate::hero::{Hero, MoveInput};
use crate::sprite::{ImageCatalog, Positioned, Sprite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Caught,
    GoalReached,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub cues: Vec<Cue>,
    pub result: Option<RunResult>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub collected: u32,
    pub target: u32,
    pub hero: Hero,
    pub enemies: Vec<Enemy>,
    pub candies: Vec<Sprite>,
    pub goal: Option<Sprite>,
    settings: SessionConfig,
    catalog: Arc<ImageCatalog>,
}

impl GameSession {
    /// Fresh run: nothing collected, no goal, actors at their start positions
    /// and `candy_target` candies scattered uniformly (overlap allowed).
    pub fn start_new_run<R: Rng + ?Sized>(
        config: &GameConfig,
        catalog: Arc<ImageCatalog>,
        rng: &mut R,
    ) -> Self {
        let settings = config.session.clone();
        let hero = Hero::new(&config.hero, settings.padding, Arc::clone(&catalog));
        let enemies = config
            .enemies
            .0
            .iter()
            .map(|enemy| Enemy::new(enemy, Arc::clone(&catalog)))
            .collect();

        let margin = settings.candy_margin;
        let max_x = SCREEN_WIDTH as i32 - margin;
        let max_y = SCREEN_HEIGHT as i32 - margin;
        let candies = (0..settings.candy_target)
            .map(|_| {
                let x = rng.gen_range(margin..=max_x);
                let y = rng.gen_range(margin..=max_y);
                Sprite::new(
                    Arc::clone(&catalog),
                    &settings.candy_image,
                    Vec2::new(x as f32, y as f32),
                    Vec2::from(settings.candy_fallback_size),
                )
            })
            .collect();

        log::info!(
            "New run: {} candies, {} enemies",
            settings.candy_target,
            config.enemies.0.len()
        );

        Self {
            collected: 0,
            target: settings.candy_target,
            hero,
            enemies,
            candies,
            goal: None,
            settings,
            catalog,
        }
    }

    pub fn update(&mut self, dt: f32, input: &MoveInput) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.hero.update(dt, input) {
            outcome.cues.push(Cue::Sfx(SFX_STEP));
        }
        for enemy in &mut self.enemies {
            enemy.update(dt);
        }

        let hero_box = self.hero.hitbox();

        if self
            .enemies
            .iter()
            .any(|enemy| enemy.hitbox().intersects(&hero_box))
        {
            outcome.cues.push(Cue::Sfx(SFX_HIT));
            outcome.result = Some(RunResult::Caught);
            return outcome;
        }

        let before = self.candies.len();
        self.candies
            .retain(|candy| !candy.hitbox().intersects(&hero_box));
        let picked = before - self.candies.len();
        if picked > 0 {
            self.collected += picked as u32;
            outcome.cues.push(Cue::Sfx(SFX_PICKUP));
        }

        if self.collected >= self.target && self.goal.is_none() {
            self.goal = Some(Sprite::new(
                Arc::clone(&self.catalog),
                &self.settings.goal_image,
                Vec2::new(self.settings.goal_x, self.settings.goal_y),
                Vec2::from(self.settings.goal_fallback_size),
            ));
            log::info!("Goal unlocked after {} candies", self.collected);
        }

        if let Some(goal) = &self.goal {
            if goal.hitbox().intersects(&hero_box) {
                outcome.cues.push(Cue::Sfx(SFX_WIN));
                outcome.result = Some(RunResult::GoalReached);
            }
        }

        outcome
    }

    /// Sprites in draw order: candies, goal, enemies, hero.
    pub fn draw_list(&self) -> Vec<&Sprite> {
        let mut sprites: Vec<&Sprite> = self.candies.iter().collect();
        sprites.extend(self.goal.as_ref());
        sprites.extend(self.enemies.iter().map(|enemy| &enemy.sprite));
        sprites.push(&self.hero.sprite);
        sprites
    }
}
