//! Fixed-timestep clock.
//!
//! The frame driver feeds wall-clock deltas in with `begin_frame()` and then
//! drains whole simulation steps with `should_step()`. Game rules therefore
//! always see the same `dt`, independent of display refresh rate.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;
const DEFAULT_STEP: f64 = 1.0 / 60.0;
const DEFAULT_MAX_FRAME: f64 = 0.25;

pub struct TimeState {
    pub fixed_dt: f64,
    /// Longest wall-clock delta accepted per frame (spiral-of-death cap).
    pub max_frame: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP, DEFAULT_MAX_FRAME)
    }

    pub fn with_step(fixed_dt: f64, max_frame: f64) -> Self {
        Self {
            fixed_dt,
            max_frame,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Measure the wall-clock delta since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance_by(real_dt);
    }

    /// Feed an explicit delta (seconds). Used by `begin_frame` and by tests.
    pub fn advance_by(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);
        if self.real_dt > self.max_frame {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                self.real_dt * 1000.0,
                self.max_frame * 1000.0
            );
            self.real_dt = self.max_frame;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Step size in the precision the game rules use.
    pub fn step_seconds(&self) -> f32 {
        self.fixed_dt as f32
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
