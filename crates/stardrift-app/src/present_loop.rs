//! Display refresh pacing.
//!
//! Turns elapsed wall-clock time into a whole number of display refreshes at a
//! fixed rate, the way a compositor's vsync does, using an accumulator. Each
//! refresh presents one frame with its presentation timestamp.

use std::time::{Duration, Instant};
use tracing::warn;

/// Maximum frame time clamp. Longer stalls drop refreshes instead of
/// presenting a burst of catch-up frames.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-rate refresh pacing.
pub struct PresentLoop {
    refresh_interval: f64,
    previous_time: Instant,
    accumulator: f64,
    refreshes: u64,
}

impl PresentLoop {
    /// Creates a loop presenting at `refresh_hz` (clamped to at least 1 Hz).
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            refresh_interval: 1.0 / refresh_hz.max(1) as f64,
            previous_time: Instant::now(),
            accumulator: 0.0,
            refreshes: 0,
        }
    }

    /// Seconds between refreshes.
    pub fn refresh_interval(&self) -> f64 {
        self.refresh_interval
    }

    /// Measure wall-clock time since the last call and present every refresh
    /// that fell due.
    pub fn tick(&mut self, present_fn: impl FnMut(Duration)) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, present_fn)
    }

    /// Present exactly one refresh, ignoring the wall clock.
    pub fn step(&mut self, present_fn: impl FnMut(Duration)) -> u32 {
        self.advance(self.refresh_interval, present_fn)
    }

    /// Advance by an explicit frame time (seconds). Returns the number of
    /// refreshes presented.
    pub fn advance(&mut self, frame_time: f64, mut present_fn: impl FnMut(Duration)) -> u32 {
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

        let mut presented = 0;
        // Tolerance absorbs rounding so a whole interval always presents.
        while self.accumulator + 1e-9 >= self.refresh_interval {
            self.accumulator = (self.accumulator - self.refresh_interval).max(0.0);
            self.refreshes += 1;
            present_fn(self.timestamp());
            presented += 1;
        }
        presented
    }

    /// Presentation time of the most recent refresh.
    pub fn timestamp(&self) -> Duration {
        Duration::from_secs_f64(self.refreshes as f64 * self.refresh_interval)
    }

    /// Time until the next refresh is due.
    pub fn until_next(&self) -> Duration {
        Duration::from_secs_f64((self.refresh_interval - self.accumulator).max(0.0))
    }

    /// Total refreshes presented.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
