//! Time management utilities
//!
//! Frame timing plus the fixed-timestep accumulator that drives physics.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall-clock frame timer
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Fixed-timestep settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepConfig {
    /// Length of one simulated tick in seconds
    pub step: f32,

    /// Frames longer than this are dropped instead of caught up
    pub max_frame_time: f32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0,
            max_frame_time: 0.25,
        }
    }
}

/// Fixed-timestep accumulator
///
/// Converts variable frame times into a whole number of constant-length
/// ticks. A frame longer than `max_frame_time` resets the accumulator
/// instead of scheduling a burst of catch-up ticks, so one pathological
/// frame cannot snowball into a spiral of ever longer frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_frame_time: f32,
    accumulator: f32,
    dropped_frames: u64,
    ticks: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given tick length and safety cap
    pub fn new(step: f32, max_frame_time: f32) -> Self {
        Self {
            step,
            max_frame_time,
            accumulator: 0.0,
            dropped_frames: 0,
            ticks: 0,
        }
    }

    /// Create an accumulator from configuration
    pub fn from_config(config: &TimestepConfig) -> Self {
        Self::new(config.step, config.max_frame_time)
    }

    /// Add a frame's elapsed time and return how many ticks to simulate
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        if elapsed > self.max_frame_time {
            log::warn!(
                "Frame took {:.3}s (cap {:.3}s), dropping accumulated time",
                elapsed,
                self.max_frame_time
            );
            self.accumulator = 0.0;
            self.dropped_frames += 1;
            return 0;
        }

        self.accumulator += elapsed.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        self.ticks += u64::from(ticks);
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of frames dropped by the safety cap
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Total ticks scheduled since creation
    pub fn total_ticks(&self) -> u64 {
        self.ticks
    }
}
