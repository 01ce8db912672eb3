//! Elapsed-time counter advanced by per-frame `extrp`.
//!
//! A tick counts logical frames. Durations expressed in milliseconds are
//! compared through a [`FrameRate`], so a feature tuned in ms keeps its timing
//! when the logical rate changes.

use crate::core::time::FrameRate;

/// Monotonic frame counter that can be started, stopped and restarted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    /// Accumulated frames since the last (re)start.
    ticks: f64,
    /// Whether `update` accumulates.
    started: bool,
    /// Paused ticks keep their value but ignore updates.
    paused: bool,
}

impl Tick {
    /// A stopped tick at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tick that is already running.
    pub fn started() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    /// Start counting. Does nothing if already started.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.paused = false;
        }
    }

    /// Stop counting and drop the accumulated value.
    pub fn stop(&mut self) {
        self.started = false;
        self.paused = false;
        self.ticks = 0.0;
    }

    /// Reset to zero and start.
    pub fn restart(&mut self) {
        self.ticks = 0.0;
        self.started = true;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Force the accumulated value, e.g. to make a first delay shorter.
    pub fn set(&mut self, ticks: f64) {
        self.ticks = ticks;
    }

    /// Accumulate one frame's worth of time.
    pub fn update(&mut self, extrp: f64) {
        if self.started && !self.paused {
            self.ticks += extrp;
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frames accumulated since the last restart (zero when stopped).
    pub fn elapsed_ticks(&self) -> f64 {
        self.ticks
    }

    /// Milliseconds accumulated since the last restart.
    pub fn elapsed_ms(&self, rate: FrameRate) -> f64 {
        rate.ticks_to_ms(self.ticks)
    }

    /// True once at least `ticks` frames elapsed. Always false when stopped.
    pub fn elapsed(&self, ticks: f64) -> bool {
        self.started && self.ticks >= ticks
    }

    /// True once at least `ms` milliseconds elapsed. Always false when stopped.
    pub fn elapsed_time(&self, rate: FrameRate, ms: f64) -> bool {
        self.started && self.elapsed_ms(rate) >= ms
    }
}
