use glam::DVec2;

use crate::api::types::EntityId;
use crate::components::animation::{AnimState, Animation, Animator};
use crate::components::collision::Collidable;
use crate::components::force::Force;
use crate::components::launcher::Launcher;

/// One game object: position, motion, animation and optional parts.
/// Features mutate only the entity they are attached to.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier, renewed on every spawn.
    pub id: EntityId,
    /// Template name the entity was spawned from.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Set once destruction was requested; the host removes it at the end of the batch.
    pub destroyed: bool,
    /// Position in world space (Y up).
    pub pos: DVec2,
    /// Position at the start of the current frame.
    pub old_pos: DVec2,
    /// Width and height in world units.
    pub size: DVec2,
    /// Remaining health; features may stop acting at zero.
    pub health: i32,
    /// Name of the current high-level state (`idle`, `bitten`, ...).
    pub state: String,
    /// Per-spawn seed for randomized behavior.
    pub seed: u64,
    /// Horizontal input read by the host movement model (-1, 0, 1).
    pub steer: f64,
    /// Whether the host integrates `velocity` and `jump` into `pos`.
    pub kinematic: bool,
    pub velocity: Force,
    pub jump: Force,
    pub animator: Option<Animator>,
    pub collidable: Option<Collidable>,
    pub launcher: Option<Launcher>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            destroyed: false,
            pos: DVec2::ZERO,
            old_pos: DVec2::ZERO,
            size: DVec2::ONE,
            health: 1,
            state: String::new(),
            seed: 0,
            steer: 0.0,
            kinematic: false,
            velocity: Force::default(),
            jump: Force::default(),
            animator: None,
            collidable: None,
            launcher: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: DVec2) -> Self {
        self.pos = pos;
        self.old_pos = pos;
        self
    }

    pub fn with_size(mut self, size: DVec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_animator(mut self) -> Self {
        self.animator = Some(Animator::new());
        self
    }

    pub fn with_collidable(mut self, collidable: Collidable) -> Self {
        self.collidable = Some(collidable);
        self
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn with_kinematic(mut self, kinematic: bool) -> Self {
        self.kinematic = kinematic;
        self
    }

    // -- Transform --

    /// Move by `delta` scaled by `extrp`.
    pub fn move_location(&mut self, extrp: f64, delta: DVec2) {
        self.pos += delta * extrp;
    }

    pub fn move_location_x(&mut self, extrp: f64, dx: f64) {
        self.pos.x += dx * extrp;
    }

    pub fn move_location_y(&mut self, extrp: f64, dy: f64) {
        self.pos.y += dy * extrp;
    }

    /// Place without leaving a movement trace (old position follows).
    pub fn teleport(&mut self, pos: DVec2) {
        self.pos = pos;
        self.old_pos = pos;
    }

    pub fn teleport_x(&mut self, x: f64) {
        self.pos.x = x;
        self.old_pos.x = x;
    }

    pub fn teleport_y(&mut self, y: f64) {
        self.pos.y = y;
        self.old_pos.y = y;
    }

    /// Whether the entity went down since the start of the frame.
    pub fn is_descending(&self) -> bool {
        self.pos.y < self.old_pos.y
    }

    // -- Animation --

    /// Play an animation if the entity has an animator.
    pub fn play(&mut self, anim: &Animation) {
        if let Some(animator) = self.animator.as_mut() {
            animator.play(anim);
        }
    }

    /// Animator state, `Stopped` for entities without one.
    pub fn anim_state(&self) -> AnimState {
        self.animator
            .as_ref()
            .map(Animator::state)
            .unwrap_or_default()
    }

    pub fn anim_frame(&self) -> u32 {
        self.animator.as_ref().map(Animator::frame).unwrap_or(0)
    }

    pub fn set_collidable_enabled(&mut self, enabled: bool) {
        if let Some(collidable) = self.collidable.as_mut() {
            collidable.set_enabled(enabled);
        }
    }
}
