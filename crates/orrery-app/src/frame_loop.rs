//! Fixed-timestep frame loop.
//!
//! Frame times are fed in explicitly, so a run is reproducible from the
//! sequence of frame times alone. Each frame runs zero or more fixed-size
//! simulation steps out of an accumulator.

use tracing::warn;

/// Longest frame time credited to the accumulator; anything above is dropped
/// rather than caught up with a burst of steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator state for a fixed-timestep loop.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    fixed_dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    /// A loop stepping the simulation `fixed_dt` seconds at a time.
    ///
    /// Non-positive or non-finite steps fall back to 1/60 s.
    pub fn new(fixed_dt: f64) -> Self {
        let fixed_dt = if fixed_dt.is_finite() && fixed_dt > 0.0 {
            fixed_dt
        } else {
            warn!("invalid fixed_dt {fixed_dt}, using 1/60 s");
            1.0 / 60.0
        };
        Self {
            fixed_dt,
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame of `frame_time` seconds and return how many steps ran.
    ///
    /// `update_fn(fixed_dt)` runs once per whole step in the accumulator. The
    /// leftover fraction of a step is available from [`alpha`](Self::alpha).
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt {
            update_fn(self.fixed_dt);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
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

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
