//! What a feature can reach while it runs.
//!
//! Collaborators are handed in explicitly through [`FeatureContext`]: the
//! owning entity (mutable), the shared [`Services`] (read-only) and a
//! [`Commands`] queue for anything that affects other entities or the map.
//! The stage drains the queue after each callback batch.

use glam::DVec2;

use crate::api::types::{EntityId, SoundEvent};
use crate::components::entity::Entity;
use crate::components::force::Force;
use crate::components::tilemap::MapTile;
use crate::core::time::FrameRate;
use crate::core::viewer::Viewer;

/// Position snapshot of the tracked entity (usually the player).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracked {
    pub id: EntityId,
    pub pos: DVec2,
    pub old_pos: DVec2,
}

/// Shared read-only lookups available to every feature.
#[derive(Debug, Clone, Default)]
pub struct Services {
    pub rate: FrameRate,
    pub map: MapTile,
    pub viewer: Viewer,
    /// Refreshed by the stage at the start of each frame.
    pub target: Option<Tracked>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, rate: FrameRate) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_map(mut self, map: MapTile) -> Self {
        self.map = map;
        self
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }
}

/// Deferred request issued by a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an entity from a template.
    Spawn { template: String, pos: DVec2 },
    /// Create a projectile driven by `force`.
    Launch {
        template: String,
        pos: DVec2,
        force: Force,
    },
    /// Destroy the issuing entity.
    Destroy,
    Sound(SoundEvent),
    RemoveTile { tx: u32, ty: u32 },
    /// Another entity's state was changed during a collision callback.
    StateChanged { target: EntityId, state: String },
}

/// A command tagged with the entity that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Issued {
    pub source: EntityId,
    pub command: Command,
}

/// Ordered queue of pending commands.
#[derive(Debug, Clone, Default)]
pub struct Commands {
    issued: Vec<Issued>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: EntityId, command: Command) {
        self.issued.push(Issued { source, command });
    }

    /// Take every pending command in issue order.
    pub fn drain(&mut self) -> Vec<Issued> {
        std::mem::take(&mut self.issued)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issued> {
        self.issued.iter()
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    pub fn clear(&mut self) {
        self.issued.clear();
    }
}

/// Access handed to a feature callback.
pub struct FeatureContext<'a> {
    pub entity: &'a mut Entity,
    pub services: &'a Services,
    pub commands: &'a mut Commands,
}

impl<'a> FeatureContext<'a> {
    pub fn new(entity: &'a mut Entity, services: &'a Services, commands: &'a mut Commands) -> Self {
        Self {
            entity,
            services,
            commands,
        }
    }

    pub fn rate(&self) -> FrameRate {
        self.services.rate
    }

    pub fn target(&self) -> Option<Tracked> {
        self.services.target
    }

    /// Request an entity of `template` at `pos`.
    pub fn spawn(&mut self, template: impl Into<String>, pos: DVec2) {
        let command = Command::Spawn {
            template: template.into(),
            pos,
        };
        self.commands.push(self.entity.id, command);
    }

    /// Request destruction of the owning entity. Repeated calls are ignored.
    pub fn destroy(&mut self) {
        if !self.entity.destroyed {
            self.entity.destroyed = true;
            self.commands.push(self.entity.id, Command::Destroy);
        }
    }

    pub fn play(&mut self, sound: impl Into<SoundEvent>) {
        self.commands.push(self.entity.id, Command::Sound(sound.into()));
    }

    /// Launch the entity's projectile along `direction`.
    /// Returns false (and does nothing) for entities without a launcher.
    pub fn fire(&mut self, direction: DVec2) -> bool {
        self.fire_with(Force::new(direction))
    }

    /// Launch with a force whose direction may ease toward a destination.
    pub fn fire_with(&mut self, force: Force) -> bool {
        let Some(launcher) = self.entity.launcher.as_ref() else {
            log::warn!("{} ({}) fired without a launcher", self.entity.id, self.entity.tag);
            return false;
        };
        let command = Command::Launch {
            template: launcher.projectile.clone(),
            pos: self.entity.pos + launcher.offset(),
            force,
        };
        self.commands.push(self.entity.id, command);
        true
    }

    /// Launch toward the tracked target at `speed`, or along the launcher's
    /// own direction when nothing is tracked.
    pub fn fire_at(&mut self, speed: f64) -> bool {
        let Some(launcher) = self.entity.launcher.as_ref() else {
            return self.fire(DVec2::ZERO);
        };
        let origin = self.entity.pos + launcher.offset();
        let direction = match self.services.target {
            Some(target) => (target.pos - origin).normalize_or_zero() * speed,
            None => launcher.direction(),
        };
        self.fire(direction)
    }

    pub fn remove_tile(&mut self, tx: u32, ty: u32) {
        self.commands.push(self.entity.id, Command::RemoveTile { tx, ty });
    }

    /// Switch another entity's state during a collision callback.
    pub fn change_state(&mut self, other: &mut Entity, state: &str) {
        other.state = state.to_string();
        let command = Command::StateChanged {
            target: other.id,
            state: state.to_string(),
        };
        self.commands.push(self.entity.id, command);
    }

    /// Whether the owning entity is on screen.
    pub fn is_viewable(&self) -> bool {
        self.services.viewer.is_viewable(self.entity, DVec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::launcher::Launcher;

    fn shooter() -> Entity {
        Entity::new(EntityId(7))
            .with_pos(DVec2::new(10.0, 10.0))
            .with_launcher(Launcher::new("Bullet", DVec2::new(-2.0, 0.0)).with_offset(DVec2::new(0.0, 4.0)))
    }

    #[test]
    fn destroy_is_issued_once() {
        let mut entity = Entity::new(EntityId(1));
        let services = Services::new();
        let mut commands = Commands::new();
        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        ctx.destroy();
        ctx.destroy();
        assert!(entity.destroyed);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn fire_uses_launcher_offset() {
        let mut entity = shooter();
        let services = Services::new();
        let mut commands = Commands::new();
        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        assert!(ctx.fire(DVec2::new(-1.0, 0.5)));

        let issued = commands.drain();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].source, EntityId(7));
        assert_eq!(
            issued[0].command,
            Command::Launch {
                template: "Bullet".into(),
                pos: DVec2::new(10.0, 14.0),
                force: Force::new(DVec2::new(-1.0, 0.5)),
            }
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn fire_without_launcher_is_quiet() {
        let mut entity = Entity::new(EntityId(2));
        let services = Services::new();
        let mut commands = Commands::new();
        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        assert!(!ctx.fire(DVec2::X));
        assert!(!ctx.fire_at(1.0));
        assert!(commands.is_empty());
    }

    #[test]
    fn fire_at_aims_at_target() {
        let mut entity = shooter();
        let mut services = Services::new();
        services.target = Some(Tracked {
            id: EntityId(1),
            pos: DVec2::new(10.0, 24.0),
            old_pos: DVec2::new(10.0, 24.0),
        });
        let mut commands = Commands::new();
        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        ctx.fire_at(0.25);
        match &commands.drain()[0].command {
            Command::Launch { force, .. } => assert_eq!(force.direction, DVec2::new(0.0, 0.25)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fire_at_without_target_uses_launcher_direction() {
        let mut entity = shooter();
        let services = Services::new();
        let mut commands = Commands::new();
        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        ctx.fire_at(0.25);
        match &commands.drain()[0].command {
            Command::Launch { force, .. } => assert_eq!(force.direction, DVec2::new(-2.0, 0.0)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
