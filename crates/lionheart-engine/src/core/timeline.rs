//! Delayed actions keyed to a tick, for features that schedule several
//! effects up front.

use crate::core::tick::Tick;
use crate::core::time::FrameRate;

/// Actions released once their delay has elapsed on a reference tick.
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    pending: Vec<(f64, A)>,
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue `action` to be released `delay_ms` after the tick's last restart.
    pub fn schedule(&mut self, delay_ms: f64, action: A) {
        self.pending.push((delay_ms, action));
    }

    /// Take every action whose delay has elapsed, in scheduling order.
    pub fn poll(&mut self, tick: &Tick, rate: FrameRate) -> Vec<A> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if tick.elapsed_time(rate, self.pending[i].0) {
                due.push(self.pending.remove(i).1);
            } else {
                i += 1;
            }
        }
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}
