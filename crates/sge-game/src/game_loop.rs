//! Fixed-timestep game loop ("Fix Your Timestep").
//!
//! Simulation runs at a fixed rate driven by an accumulator; rendering runs
//! once per frame with an interpolation alpha.

use std::time::Instant;

use tracing::warn;

/// Default simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame the accumulator will absorb. Slower frames are clamped
/// and the simulation falls behind wall-clock time.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    fixed_dt: f64,
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    /// A loop stepping the simulation every `fixed_dt` seconds.
    pub fn new(fixed_dt: f64) -> Self {
        debug_assert!(fixed_dt > 0.0, "fixed timestep must be positive");
        Self {
            fixed_dt,
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame measured against the wall clock.
    ///
    /// - `update_fn(fixed_dt, total_sim_time)` is called zero or more times.
    /// - `render_fn(alpha)` is called exactly once, `alpha` in `[0.0, 1.0)`.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.tick_with(frame_time, update_fn, render_fn);
    }

    /// Runs one frame that took `frame_time` seconds. Headless runs and tests
    /// drive the loop through this directly.
    pub fn tick_with(
        &mut self,
        mut frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= self.fixed_dt {
            update_fn(self.fixed_dt, self.total_sim_time);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Interpolation alpha without running a tick.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Total simulated time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(FIXED_DT)
    }
}
