//! The player-controlled sprite.

use std::sync::Arc;

use glam::Vec2;
use se_core::animation::AnimationController;
use se_core::input::{InputState, Key};

use crate::config::{HeroConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sprite::{Animated, ImageCatalog, Positioned, Sprite};

/// Direction keys sampled for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveInput {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            left: input.is_held(Key::Left),
            right: input.is_held(Key::Right),
            up: input.is_held(Key::Up),
            down: input.is_held(Key::Down),
        }
    }

    /// Per-axis velocity. Left beats right and up beats down when both are
    /// held; diagonals are not normalized.
    pub fn velocity(&self, speed: f32) -> Vec2 {
        let vx = if self.left {
            -speed
        } else if self.right {
            speed
        } else {
            0.0
        };
        let vy = if self.up {
            -speed
        } else if self.down {
            speed
        } else {
            0.0
        };
        Vec2::new(vx, vy)
    }
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub sprite: Sprite,
    pub anim: AnimationController,
    pub speed: f32,
    pub step_interval: f32,
    step_timer: f32,
    padding: f32,
}

impl Hero {
    pub fn new(config: &HeroConfig, padding: f32, catalog: Arc<ImageCatalog>) -> Self {
        let first = config
            .idle_frames
            .first()
            .map(String::as_str)
            .unwrap_or_default();
        let mut sprite = Sprite::new(
            catalog,
            first,
            Vec2::new(config.start_x, config.start_y),
            Vec2::from(config.fallback_size),
        );
        let anim = AnimationController::new(
            config.idle_frames.clone(),
            config.move_frames.clone(),
            config.idle_fps,
            config.move_fps,
            &mut sprite,
        );
        Self {
            sprite,
            anim,
            speed: config.speed,
            step_interval: config.step_interval,
            step_timer: 0.0,
            padding,
        }
    }

    /// Advance one step. Returns true when a footstep sound is due.
    pub fn update(&mut self, dt: f32, input: &MoveInput) -> bool {
        let velocity = input.velocity(self.speed);
        let moving = velocity != Vec2::ZERO;
        self.anim.set_moving(moving, &mut self.sprite);

        let pos = self.sprite.pos + velocity * dt;
        self.sprite.pos = Vec2::new(
            pos.x.clamp(self.padding, SCREEN_WIDTH - self.padding),
            pos.y.clamp(self.padding, SCREEN_HEIGHT - self.padding),
        );

        self.anim.advance(dt, &mut self.sprite);
        self.update_steps(dt, moving)
    }

    fn update_steps(&mut self, dt: f32, moving: bool) -> bool {
        if !moving {
            self.step_timer = 0.0;
            return false;
        }

        self.step_timer -= dt;
        if self.step_timer <= 0.0 {
            self.step_timer = self.step_interval;
            return true;
        }
        false
    }

    pub fn step_timer(&self) -> f32 {
        self.step_timer
    }
}

impl Positioned for Hero {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

impl Animated for Hero {
    fn animation(&self) -> &AnimationController {
        &self.anim
    }
}
