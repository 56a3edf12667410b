//! Frame-cycling sprite animation with separate idle and moving sequences.
//!
//! Every animated entity owns one `AnimationController`. The controller keeps
//! only frame bookkeeping; showing a frame is delegated to a `FrameTarget`
//! (normally the entity's sprite). Frame application is best-effort: a target
//! that fails to resolve an image leaves the previous frame on screen while
//! the controller keeps cycling.
//!
//! Timing uses a per-mode step of `1 / fps` seconds. When the accumulator
//! reaches the step it is reset to zero rather than reduced by the step, so a
//! long frame advances the animation by exactly one frame.

use std::fmt;

/// Something that can display an animation frame by image identifier.
pub trait FrameTarget {
    type Error: fmt::Display;

    fn apply_frame(&mut self, image_id: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone)]
pub struct AnimationController {
    idle_frames: Vec<String>,
    move_frames: Vec<String>,
    frame_index: usize,
    idle_step: f32,
    move_step: f32,
    elapsed: f32,
    moving: bool,
}

impl AnimationController {
    /// Build a controller in idle mode and show the first idle frame on `target`.
    ///
    /// Frame rates below 1 are floored to 1 fps.
    pub fn new<T: FrameTarget>(
        idle_frames: Vec<String>,
        move_frames: Vec<String>,
        idle_fps: f32,
        move_fps: f32,
        target: &mut T,
    ) -> Self {
        let controller = Self {
            idle_frames,
            move_frames,
            frame_index: 0,
            idle_step: 1.0 / idle_fps.max(1.0),
            move_step: 1.0 / move_fps.max(1.0),
            elapsed: 0.0,
            moving: false,
        };
        controller.show_current(target);
        controller
    }

    /// Switch between the idle and moving sequences.
    ///
    /// Repeating the current mode is a no-op: index and timer are preserved.
    pub fn set_moving<T: FrameTarget>(&mut self, moving: bool, target: &mut T) {
        if moving == self.moving {
            return;
        }
        self.moving = moving;
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.show_current(target);
    }

    /// Accumulate `dt` seconds and step to the next frame when the mode's
    /// frame duration has elapsed. Sequences shorter than two frames are static.
    pub fn advance<T: FrameTarget>(&mut self, dt: f32, target: &mut T) {
        let len = self.active_frames().len();
        if len < 2 {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.frame_step() {
            self.elapsed = 0.0;
            self.frame_index = (self.frame_index + 1) % len;
            self.show_current(target);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds per frame for the active mode.
    pub fn frame_step(&self) -> f32 {
        if self.moving {
            self.move_step
        } else {
            self.idle_step
        }
    }

    pub fn active_frames(&self) -> &[String] {
        if self.moving {
            &self.move_frames
        } else {
            &self.idle_frames
        }
    }

    pub fn current_frame(&self) -> Option<&str> {
        self.active_frames()
            .get(self.frame_index)
            .map(String::as_str)
    }

    fn show_current<T: FrameTarget>(&self, target: &mut T) {
        let Some(image_id) = self.current_frame() else {
            return;
        };
        if let Err(err) = target.apply_frame(image_id) {
            log::debug!("Animation frame '{}' not applied: {}", image_id, err);
        }
    }
}
