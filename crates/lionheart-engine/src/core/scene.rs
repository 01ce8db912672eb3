use std::collections::HashMap;
use std::rc::Rc;

use crate::api::context::{Commands, FeatureContext, Services};
use crate::api::feature::{Capabilities, Feature};
use crate::api::types::EntityId;
use crate::assets::registry::Template;
use crate::components::animation::AnimState;
use crate::components::collision::{Collision, CollisionCategory, CollisionResult};
use crate::components::entity::Entity;

/// An entity together with the features attached to it.
pub struct Slot {
    pub entity: Entity,
    template: Rc<Template>,
    features: Vec<Box<dyn Feature>>,
    capabilities: Capabilities,
}

impl Slot {
    /// Attach freshly built features and run their one-time preparation.
    pub fn new(entity: Entity, template: Rc<Template>, mut features: Vec<Box<dyn Feature>>) -> Self {
        let mut capabilities = Capabilities::NONE;
        for feature in features.iter_mut() {
            feature.prepare(&entity);
            capabilities.insert(feature.capabilities());
        }
        Self {
            entity,
            template,
            features,
            capabilities,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn template(&self) -> &Rc<Template> {
        &self.template
    }

    /// Union of the capabilities of every attached feature.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn features(&self) -> impl Iterator<Item = &dyn Feature> {
        self.features.iter().map(|feature| feature.as_ref())
    }

    pub fn recycle(&mut self) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(recyclable) = feature.recyclable() {
                recyclable.recycle(entity);
            }
        }
    }

    pub fn run_routines(&mut self, extrp: f64, services: &Services, commands: &mut Commands) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(routine) = feature.routine() {
                let mut ctx = FeatureContext::new(entity, services, commands);
                routine.update(extrp, &mut ctx);
            }
        }
    }

    pub fn dispatch_anim_frame(&mut self, frame: u32, services: &Services, commands: &mut Commands) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(listener) = feature.animation_listener() {
                let mut ctx = FeatureContext::new(entity, services, commands);
                listener.notify_anim_frame(frame, &mut ctx);
            }
        }
    }

    pub fn dispatch_anim_state(&mut self, state: AnimState, services: &Services, commands: &mut Commands) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(listener) = feature.animation_listener() {
                let mut ctx = FeatureContext::new(entity, services, commands);
                listener.notify_anim_state(state, &mut ctx);
            }
        }
    }

    pub fn dispatch_collided(
        &mut self,
        other: &mut Entity,
        with: &Collision,
        by: &Collision,
        services: &Services,
        commands: &mut Commands,
    ) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(listener) = feature.collidable_listener() {
                let mut ctx = FeatureContext::new(entity, services, commands);
                listener.notify_collided(other, with, by, &mut ctx);
            }
        }
    }

    pub fn dispatch_tile_collided(
        &mut self,
        result: &CollisionResult,
        category: &CollisionCategory,
        services: &Services,
        commands: &mut Commands,
    ) {
        let Self {
            entity, features, ..
        } = self;
        for feature in features.iter_mut() {
            if let Some(listener) = feature.tile_listener() {
                let mut ctx = FeatureContext::new(entity, services, commands);
                listener.notify_tile_collided(result, category, &mut ctx);
            }
        }
    }

    pub(crate) fn features_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Feature>> {
        self.features.iter_mut()
    }
}

/// Live entities in spawn order plus the per-template recycle pool.
/// Designed for small-to-medium entity counts (hundreds, not millions).
pub struct Scene {
    slots: Vec<Slot>,
    pool: HashMap<String, Vec<Slot>>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(256),
            pool: HashMap::new(),
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            pool: HashMap::new(),
        }
    }

    /// Append a slot; it updates after every slot already present.
    pub fn insert(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    /// Remove a slot by entity id, keeping the order of the others.
    pub fn remove(&mut self, id: EntityId) -> Option<Slot> {
        let idx = self.index_of(id)?;
        Some(self.slots.remove(idx))
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.entity.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.entity.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.entity.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).map(|slot| &slot.entity)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.get_mut(id).map(|slot| &mut slot.entity)
    }

    /// Borrow two distinct slots mutably at once.
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Slot, &mut Slot)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.slots.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.slots.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn slot_at_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.slots
            .iter()
            .map(|slot| &slot.entity)
            .find(|entity| entity.tag == tag)
    }

    /// Find all entities with the given tag.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.slots
            .iter()
            .map(|slot| &slot.entity)
            .filter(|entity| entity.tag == tag)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Park a removed slot for reuse by its template.
    pub fn release(&mut self, slot: Slot) {
        self.pool
            .entry(slot.template.name().to_string())
            .or_default()
            .push(slot);
    }

    /// Take a pooled slot of `template`, most recently released first.
    pub fn acquire(&mut self, template: &str) -> Option<Slot> {
        self.pool.get_mut(template)?.pop()
    }

    pub fn pooled(&self, template: &str) -> usize {
        self.pool.get(template).map_or(0, Vec::len)
    }

    /// Clear live entities and the pool.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.pool.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
