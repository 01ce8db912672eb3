//! Logical frame rate and wall-clock pacing.

/// Logical frame rate used to convert between ticks and milliseconds.
///
/// One tick is one logical frame; `extrp` values passed to features are
/// fractions or multiples of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate(pub f64);

impl FrameRate {
    /// The rate the game logic is tuned for.
    pub const DEFAULT: FrameRate = FrameRate(60.0);

    pub fn hz(self) -> f64 {
        self.0
    }

    /// Milliseconds covered by `ticks` frames.
    pub fn ticks_to_ms(self, ticks: f64) -> f64 {
        ticks * 1000.0 / self.0
    }

    /// Frames needed to cover `ms` milliseconds.
    pub fn ms_to_ticks(self, ms: f64) -> f64 {
        ms * self.0 / 1000.0
    }

    /// Convert a wall-clock frame duration into an extrapolation factor.
    pub fn extrp(self, frame_dt_secs: f64) -> f64 {
        frame_dt_secs * self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Turns wall-clock frame durations into whole logical ticks for hosts that
/// run the stage at a fixed step.
#[derive(Debug, Clone)]
pub struct FramePacer {
    rate: FrameRate,
    /// Ticks owed but not yet run.
    pending: f64,
}

impl FramePacer {
    /// At most this many ticks are run for a single wall-clock frame.
    pub const MAX_CATCH_UP: u32 = 10;

    pub fn new(rate: FrameRate) -> Self {
        Self { rate, pending: 0.0 }
    }

    /// Credit `frame_dt_secs` of wall time and return how many ticks to run now.
    pub fn credit(&mut self, frame_dt_secs: f64) -> u32 {
        let owed = self.pending + self.rate.extrp(frame_dt_secs);
        self.pending = owed.min(f64::from(Self::MAX_CATCH_UP));
        let ticks = self.pending.floor();
        self.pending -= ticks;
        ticks as u32
    }

    /// Fraction of a tick carried over to the next frame.
    pub fn carry(&self) -> f64 {
        self.pending
    }
}
