//! Headless host that owns entities and drives their features.
//!
//! The stage plays the part of the game engine around the features: it
//! spawns entities from templates (reusing pooled ones), runs one logical
//! frame per [`Stage::advance`], relays collision notifications from the
//! host and applies the commands features issue. Every applied effect is
//! appended to an event log that tests compare across runs.

use std::rc::Rc;

use glam::DVec2;
use serde_json::{Map, Value};

use crate::api::context::{Command, Commands, Issued, Services, Tracked};
use crate::api::error::ConfigResult;
use crate::api::types::{name_key, EntityId, EventKind, FeatureEvent};
use crate::assets::registry::{Template, TemplateRegistry};
use crate::components::animation::AnimState;
use crate::components::collision::{Collision, CollisionCategory, CollisionResult};
use crate::components::entity::Entity;
use crate::core::scene::{Scene, Slot};
use crate::core::time::FramePacer;

const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// The event log is never trimmed by the stage itself. Long-running hosts
/// drain it with [`Stage::take_events`] once per frame.
pub struct Stage {
    registry: TemplateRegistry,
    services: Services,
    scene: Scene,
    commands: Commands,
    events: Vec<FeatureEvent>,
    frame: u32,
    next_id: u32,
    seed: u64,
    tracked: Option<EntityId>,
    pacer: FramePacer,
}

impl Stage {
    pub fn new(registry: TemplateRegistry, services: Services) -> Self {
        let pacer = FramePacer::new(services.rate);
        Self {
            registry,
            services,
            scene: Scene::new(),
            commands: Commands::new(),
            events: Vec::new(),
            frame: 0,
            next_id: 1,
            seed: 0,
            tracked: None,
            pacer,
        }
    }

    /// Base seed mixed into every entity's seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.registry
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Host-side access to map and viewer between frames.
    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.entity(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.scene.entity_mut(id)
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn events(&self) -> &[FeatureEvent] {
        &self.events
    }

    /// Events requested by one entity, in order.
    pub fn events_for(&self, id: EntityId) -> Vec<FeatureEvent> {
        self.events
            .iter()
            .filter(|event| event.entity == id.0)
            .copied()
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Hand the logged events over to the host, leaving the log empty.
    pub fn take_events(&mut self) -> Vec<FeatureEvent> {
        std::mem::take(&mut self.events)
    }

    /// Expose this entity's position to features as the tracked target.
    pub fn track(&mut self, id: EntityId) {
        self.tracked = Some(id);
        self.refresh_target();
    }

    pub fn untrack(&mut self) {
        self.tracked = None;
        self.services.target = None;
    }

    /// Spawn an entity from a loaded template.
    ///
    /// Unknown templates are logged and yield `None`.
    pub fn spawn(&mut self, template: &str, pos: DVec2) -> Option<EntityId> {
        let template = self.lookup(template)?;
        let slot = self.acquire_slot(template, pos);
        let id = slot.id();
        self.scene.insert(slot);
        Some(id)
    }

    /// Spawn, then hand `overrides` to every feature that loads configuration.
    ///
    /// On a loader error nothing is spawned and the slot goes back to the pool.
    pub fn spawn_with(
        &mut self,
        template: &str,
        pos: DVec2,
        overrides: &Value,
    ) -> ConfigResult<Option<EntityId>> {
        let Some(template) = self.lookup(template) else {
            return Ok(None);
        };
        let mut slot = self.acquire_slot(template, pos);
        let loaded = slot.features_mut().try_for_each(|feature| match feature.loader() {
            Some(loader) => loader.load(overrides),
            None => Ok(()),
        });
        if let Err(err) = loaded {
            self.scene.release(slot);
            return Err(err);
        }
        let id = slot.id();
        self.scene.insert(slot);
        Ok(Some(id))
    }

    /// Remove an entity and pool it for reuse. Returns false for unknown ids.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(mut slot) = self.scene.remove(id) else {
            return false;
        };
        slot.entity.destroyed = true;
        log::debug!("destroyed {} ({})", id, slot.entity.tag);
        self.scene.release(slot);
        true
    }

    /// Run one logical frame scaled by `extrp`.
    pub fn advance(&mut self, extrp: f64) {
        self.frame += 1;
        self.refresh_target();

        let Self {
            scene,
            services,
            commands,
            ..
        } = self;
        for slot in scene.iter_mut() {
            if !slot.entity.active || slot.entity.destroyed {
                continue;
            }
            slot.entity.old_pos = slot.entity.pos;
            slot.run_routines(extrp, services, commands);
            if slot.entity.destroyed {
                continue;
            }
            integrate(&mut slot.entity, extrp);
            animate(slot, extrp, services, commands);
        }
        self.apply_commands();
    }

    /// Run as many whole logical frames as `dt_secs` of wall time covers.
    pub fn advance_wall(&mut self, dt_secs: f64) -> u32 {
        let steps = self.pacer.credit(dt_secs);
        for _ in 0..steps {
            self.advance(1.0);
        }
        steps
    }

    /// Region `with` of `a` touched region `by` of `b`.
    ///
    /// Only `a`'s listeners are notified; the host reports the other side
    /// separately. Ignored when either side is missing or not collidable.
    pub fn notify_collided(&mut self, a: EntityId, b: EntityId, with: &str, by: &str) {
        let Self {
            scene,
            services,
            commands,
            ..
        } = self;
        let Some((slot, other)) = scene.pair_mut(a, b) else {
            return;
        };
        if !can_collide(&slot.entity) || !can_collide(&other.entity) {
            return;
        }
        let with = Collision::new(with);
        let by = Collision::new(by);
        slot.dispatch_collided(&mut other.entity, &with, &by, services, commands);
        self.apply_commands();
    }

    /// Part `category` of entity `id` touched the map.
    pub fn notify_tile_collided(
        &mut self,
        id: EntityId,
        result: &CollisionResult,
        category: &CollisionCategory,
    ) {
        let Self {
            scene,
            services,
            commands,
            ..
        } = self;
        let Some(slot) = scene.get_mut(id) else {
            return;
        };
        if slot.entity.destroyed {
            return;
        }
        slot.dispatch_tile_collided(result, category, services, commands);
        self.apply_commands();
    }

    /// Saved configuration nodes of an entity, keyed by node name.
    pub fn save(&self, id: EntityId) -> ConfigResult<Option<Value>> {
        let Some(slot) = self.scene.get(id) else {
            return Ok(None);
        };
        let mut nodes = Map::new();
        for feature in slot.features() {
            if let Some(saver) = feature.saver() {
                if let Some((node, value)) = saver.save()? {
                    nodes.insert(node.to_string(), value);
                }
            }
        }
        Ok(Some(Value::Object(nodes)))
    }

    fn lookup(&self, name: &str) -> Option<Rc<Template>> {
        let template = self.registry.get(name);
        if template.is_none() {
            log::warn!("cannot spawn unknown template `{}`", name);
        }
        template
    }

    fn acquire_slot(&mut self, template: Rc<Template>, pos: DVec2) -> Slot {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let seed = self.entity_seed(template.name(), pos);

        let mut slot = match self.scene.acquire(template.name()) {
            Some(mut slot) => {
                template.prototype.reset(&mut slot.entity, id, pos, seed);
                log::debug!("recycled `{}` as {}", template.name(), id);
                slot
            }
            None => {
                let entity = template.prototype.instantiate(id, pos, seed);
                log::debug!("spawned `{}` as {}", template.name(), id);
                Slot::new(entity, Rc::clone(&template), template.build_features())
            }
        };
        slot.recycle();
        slot
    }

    /// Seed depends on template and placement only, so a respawn at the same
    /// place replays the same random choices.
    fn entity_seed(&self, template: &str, pos: DVec2) -> u64 {
        let place = pos.x.to_bits().rotate_left(17) ^ pos.y.to_bits();
        (self.seed ^ u64::from(name_key(template)) ^ place).wrapping_mul(SEED_MIX)
    }

    fn refresh_target(&mut self) {
        self.services.target = self
            .tracked
            .and_then(|id| self.scene.entity(id))
            .map(|entity| Tracked {
                id: entity.id,
                pos: entity.pos,
                old_pos: entity.old_pos,
            });
    }

    /// Apply queued commands in order; destructions go last.
    fn apply_commands(&mut self) {
        let mut doomed = Vec::new();
        for Issued { source, command } in self.commands.drain() {
            let origin = self.scene.entity(source).map_or(DVec2::ZERO, |entity| entity.pos);
            match command {
                Command::Spawn { template, pos } => {
                    if self.spawn(&template, pos).is_some() {
                        self.record(source, EventKind::Spawn, name_key(&template), pos);
                    }
                }
                Command::Launch {
                    template,
                    pos,
                    force,
                } => {
                    if let Some(id) = self.spawn(&template, pos) {
                        if let Some(projectile) = self.scene.entity_mut(id) {
                            projectile.kinematic = true;
                            projectile.velocity = force;
                        }
                        self.record(source, EventKind::Launch, name_key(&template), pos);
                    }
                }
                Command::Sound(sound) => self.record(source, EventKind::Sound, sound.0, origin),
                Command::RemoveTile { tx, ty } => {
                    if self.services.map.remove_tile(tx, ty).is_some() {
                        let at = DVec2::new(f64::from(tx), f64::from(ty));
                        self.record(source, EventKind::RemoveTile, tx, at);
                    }
                }
                Command::StateChanged { state, .. } => {
                    self.record(source, EventKind::StateChange, name_key(&state), origin);
                }
                Command::Destroy => doomed.push((source, origin)),
            }
        }
        for (id, origin) in doomed {
            if self.destroy(id) {
                self.record(id, EventKind::Destroy, 0, origin);
            }
        }
    }

    fn record(&mut self, source: EntityId, kind: EventKind, arg: u32, at: DVec2) {
        self.events
            .push(FeatureEvent::new(self.frame, source, kind, arg, at.x, at.y));
    }
}

fn can_collide(entity: &Entity) -> bool {
    !entity.destroyed
        && entity
            .collidable
            .as_ref()
            .is_some_and(|collidable| collidable.enabled)
}

fn integrate(entity: &mut Entity, extrp: f64) {
    if !entity.kinematic {
        return;
    }
    entity.velocity.update(extrp);
    entity.jump.update(extrp);
    let motion = entity.velocity.direction + entity.jump.direction;
    entity.move_location(extrp, motion);
}

fn animate(slot: &mut Slot, extrp: f64, services: &Services, commands: &mut Commands) {
    let Some(animator) = slot.entity.animator.as_mut() else {
        return;
    };
    let update = animator.update(extrp);
    if let Some(frame) = update.frame {
        slot.dispatch_anim_frame(frame, services, commands);
    }
    if update.finished {
        slot.dispatch_anim_state(AnimState::Finished, services, commands);
    }
}
