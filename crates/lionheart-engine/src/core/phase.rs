//! Timed phase state machine.
//!
//! A feature keeps its phase as a small `Copy` enum and owns one
//! `PhaseMachine`. Each frame it calls [`PhaseMachine::begin_frame`], then
//! either matches on [`PhaseMachine::phase`] by hand or runs a transition
//! table through [`PhaseMachine::step`].
//!
//! At most one transition happens per frame: once a phase was entered, later
//! transition attempts in the same frame are refused until the next
//! `begin_frame`.

use std::fmt::Debug;

use crate::components::animation::AnimState;
use crate::core::tick::Tick;
use crate::core::time::FrameRate;

/// Condition that lets a phase move on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guard {
    /// Phase tick reached this many frames.
    Ticks(f64),
    /// Phase tick reached this many milliseconds.
    Millis(f64),
    /// Current animation finished.
    AnimFinished,
    /// Always passes.
    Always,
}

impl Guard {
    /// Duration guards win ties against event guards.
    pub fn is_duration(&self) -> bool {
        matches!(self, Guard::Ticks(_) | Guard::Millis(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Guard::Ticks(_) | Guard::Millis(_) => 0,
            Guard::AnimFinished => 1,
            Guard::Always => 2,
        }
    }
}

/// One row of a transition table.
#[derive(Debug, Clone, Copy)]
pub struct Transition<P, A> {
    pub from: P,
    pub guard: Guard,
    pub to: P,
    /// Returned to the caller when the transition is taken.
    pub action: A,
    /// Restart the phase tick on entry.
    pub restart: bool,
}

impl<P, A> Transition<P, A> {
    pub const fn new(from: P, guard: Guard, to: P, action: A) -> Self {
        Self {
            from,
            guard,
            to,
            action,
            restart: true,
        }
    }

    /// Enter `to` without restarting the phase tick.
    pub fn keep_tick(mut self) -> Self {
        self.restart = false;
        self
    }
}

/// Phase holder with its own tick and a one-transition-per-frame latch.
#[derive(Debug, Clone)]
pub struct PhaseMachine<P> {
    initial: P,
    phase: P,
    tick: Tick,
    changed: bool,
}

impl<P: Copy + PartialEq + Debug> PhaseMachine<P> {
    pub fn new(initial: P) -> Self {
        Self {
            initial,
            phase: initial,
            tick: Tick::started(),
            changed: false,
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn is(&self, phase: P) -> bool {
        self.phase == phase
    }

    pub fn tick(&self) -> &Tick {
        &self.tick
    }

    pub fn tick_mut(&mut self) -> &mut Tick {
        &mut self.tick
    }

    /// Whether a transition already happened this frame.
    pub fn changed_this_frame(&self) -> bool {
        self.changed
    }

    /// Advance the phase tick and re-arm the transition latch.
    pub fn begin_frame(&mut self, extrp: f64) {
        self.tick.update(extrp);
        self.changed = false;
    }

    /// Move to `next` and restart the phase tick.
    pub fn enter(&mut self, next: P) -> bool {
        self.transition(next, true)
    }

    /// Move to `next`, keeping the phase tick running.
    pub fn enter_keep_tick(&mut self, next: P) -> bool {
        self.transition(next, false)
    }

    fn transition(&mut self, next: P, restart: bool) -> bool {
        if self.changed {
            log::trace!("phase {:?} -> {:?} refused, already changed this frame", self.phase, next);
            return false;
        }
        log::trace!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        self.changed = true;
        if restart {
            self.tick.restart();
        }
        true
    }

    /// Stop the phase tick; duration guards stay false until a phase is entered.
    pub fn park(&mut self) {
        self.tick.stop();
    }

    /// Back to the initial phase with a fresh tick.
    pub fn reset(&mut self) {
        self.phase = self.initial;
        self.tick.restart();
        self.changed = false;
    }

    pub fn is_ready(&self, guard: &Guard, anim: AnimState, rate: FrameRate) -> bool {
        match *guard {
            Guard::Ticks(ticks) => self.tick.elapsed(ticks),
            Guard::Millis(ms) => self.tick.elapsed_time(rate, ms),
            Guard::AnimFinished => anim == AnimState::Finished,
            Guard::Always => true,
        }
    }

    /// Take the first ready transition leaving the current phase.
    ///
    /// Duration guards are checked before animation guards, then `Always`;
    /// within a rank the table order decides.
    pub fn step<A: Copy>(
        &mut self,
        table: &[Transition<P, A>],
        anim: AnimState,
        rate: FrameRate,
    ) -> Option<A> {
        if self.changed {
            return None;
        }
        let mut best: Option<&Transition<P, A>> = None;
        for row in table.iter().filter(|row| row.from == self.phase) {
            if !self.is_ready(&row.guard, anim, rate) {
                continue;
            }
            match best {
                Some(current) if current.guard.rank() <= row.guard.rank() => {}
                _ => best = Some(row),
            }
        }
        let row = best?;
        self.transition(row.to, row.restart);
        Some(row.action)
    }
}
