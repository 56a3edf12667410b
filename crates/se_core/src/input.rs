//! Keyboard and pointer state as seen by the fixed-step simulation.
//!
//! - **Held keys** are level-triggered: `is_held(key)` is true every step the
//!   key is down. Movement and the restart key are read this way.
//!
//! - **Just-pressed / just-released** are edge-triggered and cleared by
//!   `end_frame()`. The frame driver only calls it after at least one fixed
//!   step ran, so an edge landing on a zero-step frame is not lost.
//!
//! - **Clicks** are queued with the pointer position (logical coordinates) at
//!   the moment of the press and drained with `take_clicks()`, so each click
//!   is handled exactly once no matter how many steps a frame runs.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    R,
    Escape,
    F3,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    pointer: (f32, f32),
    pointer_down: bool,
    clicks: Vec<(f32, f32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Release every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        for key in self.held.drain() {
            self.just_released.insert(key);
        }
        self.pointer_down = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }

    /// Record a primary-button press at the current pointer position.
    /// Auto-repeat presses without a release in between are ignored.
    pub fn pointer_pressed(&mut self) {
        if !self.pointer_down {
            self.pointer_down = true;
            self.clicks.push(self.pointer);
        }
    }

    pub fn pointer_released(&mut self) {
        self.pointer_down = false;
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Drain queued click positions, oldest first.
    pub fn take_clicks(&mut self) -> Vec<(f32, f32)> {
        std::mem::take(&mut self.clicks)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
