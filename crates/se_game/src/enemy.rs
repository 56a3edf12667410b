//! Enemies patrol horizontally between two bounds, always animating.

use std::sync::Arc;

use glam::Vec2;
use se_core::animation::AnimationController;

use crate::config::EnemyConfig;
use crate::sprite::{Animated, ImageCatalog, Positioned, Sprite};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub sprite: Sprite,
    pub anim: AnimationController,
    pub left_limit: f32,
    pub right_limit: f32,
    pub speed: f32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
}

impl Enemy {
    pub fn new(config: &EnemyConfig, catalog: Arc<ImageCatalog>) -> Self {
        let idle_frames = config.idle_frames();
        let mut sprite = Sprite::new(
            catalog,
            &idle_frames[0],
            Vec2::new(config.x, config.y),
            Vec2::from(config.fallback_size),
        );
        let anim = AnimationController::new(
            idle_frames,
            config.move_frames(),
            config.idle_fps,
            config.move_fps,
            &mut sprite,
        );
        Self {
            sprite,
            anim,
            left_limit: config.left_limit,
            right_limit: config.right_limit,
            speed: config.speed,
            direction: 1.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.anim.set_moving(true, &mut self.sprite);

        let x = &mut self.sprite.pos.x;
        *x += self.direction * self.speed * dt;
        if *x <= self.left_limit {
            *x = self.left_limit;
            self.direction = 1.0;
        } else if *x >= self.right_limit {
            *x = self.right_limit;
            self.direction = -1.0;
        }

        self.anim.advance(dt, &mut self.sprite);
    }
}

impl Positioned for Enemy {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

impl Animated for Enemy {
    fn animation(&self) -> &AnimationController {
        &self.anim
    }
}
