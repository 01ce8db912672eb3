//! Frame-range animations and the per-entity animator.
//!
//! Animations index frames of an entity's sheet. Speed is expressed in frames
//! per tick so an animator advances with the same `extrp` the features see.

use serde::{Deserialize, Serialize};

/// Definition of a single animation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Name as declared in the template (filled from the map key).
    #[serde(skip)]
    pub name: String,
    /// First frame (inclusive).
    pub first: u32,
    /// Last frame (inclusive).
    pub last: u32,
    /// Frames advanced per tick.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Play back down to `first` after reaching `last`.
    #[serde(default)]
    pub reverse: bool,
    /// Loop instead of finishing.
    #[serde(default)]
    pub repeat: bool,
}

fn default_speed() -> f64 {
    0.125
}

impl Animation {
    pub fn new(name: impl Into<String>, first: u32, last: u32, speed: f64) -> Self {
        Self {
            name: name.into(),
            first,
            last,
            speed,
            reverse: false,
            repeat: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Get the number of frames.
    pub fn frame_count(&self) -> u32 {
        self.last.saturating_sub(self.first) + 1
    }

    /// First attribute that makes the sequence unplayable, with the reason.
    pub fn defect(&self) -> Option<(&'static str, &'static str)> {
        if self.first > self.last {
            Some(("first", "must not exceed `last`"))
        } else if !self.speed.is_finite() || self.speed <= 0.0 {
            Some(("speed", "must be a positive number"))
        } else {
            None
        }
    }
}

/// Playback state reported to features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimState {
    #[default]
    Stopped,
    Playing,
    Reversing,
    Finished,
}

/// What changed during one animator update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimUpdate {
    /// New frame, if the displayed frame changed.
    pub frame: Option<u32>,
    /// The animation reached its end during this update.
    pub finished: bool,
}

/// Animation state for an entity.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    current: Option<Animation>,
    position: f64,
    frame: u32,
    state: AnimState,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play an animation from its first frame.
    pub fn play(&mut self, anim: &Animation) {
        self.position = anim.first as f64;
        self.frame = anim.first;
        self.state = AnimState::Playing;
        self.current = Some(anim.clone());
    }

    /// Jump to a frame of the current animation.
    pub fn set_frame(&mut self, frame: u32) {
        self.position = frame as f64;
        self.frame = frame;
    }

    /// Stop playback, keeping the displayed frame.
    pub fn stop(&mut self) {
        self.state = AnimState::Stopped;
    }

    /// Forget the current animation entirely.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn is(&self, state: AnimState) -> bool {
        self.state == state
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Name of the current animation, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|anim| anim.name.as_str())
    }

    /// Advance by `extrp` ticks.
    pub fn update(&mut self, extrp: f64) -> AnimUpdate {
        let Some(anim) = self.current.as_ref() else {
            return AnimUpdate::default();
        };
        let first = anim.first as f64;
        let end = anim.last as f64 + 1.0;
        let mut finished = false;

        match self.state {
            AnimState::Playing => {
                self.position += anim.speed * extrp;
                if self.position >= end {
                    if anim.reverse {
                        self.position = anim.last as f64;
                        self.state = AnimState::Reversing;
                    } else if anim.repeat {
                        let len = end - first;
                        self.position = first + (self.position - first) % len;
                    } else {
                        self.position = anim.last as f64;
                        self.state = AnimState::Finished;
                        finished = true;
                    }
                }
            }
            AnimState::Reversing => {
                self.position -= anim.speed * extrp;
                if self.position < first {
                    self.position = first;
                    if anim.repeat {
                        self.state = AnimState::Playing;
                    } else {
                        self.state = AnimState::Finished;
                        finished = true;
                    }
                }
            }
            AnimState::Stopped | AnimState::Finished => {}
        }

        let frame = (self.position.floor() as u32).min(anim.last).max(anim.first);
        let changed = frame != self.frame;
        self.frame = frame;
        AnimUpdate {
            frame: changed.then_some(frame),
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_is_inclusive() {
        assert_eq!(Animation::new("idle", 1, 4, 0.25).frame_count(), 4);
    }

    #[test]
    fn unplayable_ranges_are_flagged() {
        assert_eq!(Animation::new("idle", 1, 4, 0.25).defect(), None);
        assert_eq!(Animation::new("idle", 5, 2, 0.25).defect().map(|d| d.0), Some("first"));
        assert_eq!(Animation::new("idle", 1, 2, 0.0).defect().map(|d| d.0), Some("speed"));
        assert_eq!(Animation::new("idle", 1, 2, f64::NAN).defect().map(|d| d.0), Some("speed"));
    }

    #[test]
    fn inverted_range_does_not_panic_while_playing() {
        let broken = Animation::new("idle", 5, 2, 1.0);
        let mut anim = Animator::new();
        anim.play(&broken);
        for _ in 0..4 {
            anim.update(1.0);
        }
    }

    #[test]
    fn animation_ticks_through_frames() {
        let walk = Animation::new("walk", 1, 4, 0.5).repeated();
        let mut anim = Animator::new();
        anim.play(&walk);
        assert_eq!(anim.frame(), 1);

        let update = anim.update(2.0);
        assert_eq!(update.frame, Some(2));

        anim.update(6.0);
        // 1 + 4 frames, wrapped back to the first frame
        assert_eq!(anim.frame(), 1);
        assert!(anim.is(AnimState::Playing));
    }

    #[test]
    fn non_looping_animation_finishes_on_last_frame() {
        let attack = Animation::new("attack", 1, 3, 1.0);
        let mut anim = Animator::new();
        anim.play(&attack);

        assert!(!anim.update(1.0).finished);
        assert!(!anim.update(1.0).finished);
        let update = anim.update(1.0);
        assert!(update.finished);
        assert!(anim.is(AnimState::Finished));
        assert_eq!(anim.frame(), 3);

        // Stays finished without reporting again
        assert_eq!(anim.update(1.0), AnimUpdate::default());
    }

    #[test]
    fn reverse_plays_back_down() {
        let raise = Animation::new("raise", 1, 3, 1.0).reversed();
        let mut anim = Animator::new();
        anim.play(&raise);
        anim.update(3.0);
        assert!(anim.is(AnimState::Reversing));
        assert_eq!(anim.frame(), 3);

        let update = anim.update(3.0);
        assert!(update.finished);
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn empty_animator_reports_nothing() {
        let mut anim = Animator::new();
        assert_eq!(anim.update(1.0), AnimUpdate::default());
        assert!(anim.is(AnimState::Stopped));
        assert_eq!(anim.current(), None);
    }

    #[test]
    fn parse_from_template_json() {
        let anim: Animation =
            serde_json::from_str(r#"{ "first": 2, "last": 5, "repeat": true }"#).unwrap();
        assert_eq!(anim.first, 2);
        assert_eq!(anim.speed, 0.125);
        assert!(anim.repeat);
        assert!(!anim.reverse);
    }
}
