//! Gameplay features of Lionheart built on `lionheart-engine`.
//!
//! Each module holds one feature: its configuration node, its phase enum and
//! the loader registered under the feature's name by [`register_all`].

pub mod block;
pub mod bullet;
pub mod canon1;
pub mod canon2;
pub mod dragon1;
pub mod effect;
pub mod explode5;
pub mod fly;
pub mod follow;
pub mod geyzer;
pub mod gobelin;
pub mod norka_walk;
pub mod plant;
pub mod sfx;
pub mod shooter;
pub mod spike;


use lionheart_engine::FeatureRegistry;

pub use sfx::Sfx;

/// Register every catalog feature under its node name.
pub fn register_all(registry: &mut FeatureRegistry) {
    registry.register(block::NAME, block::load);
    registry.register(bullet::NAME, bullet::load);
    registry.register(canon1::NAME, canon1::load);
    registry.register(canon2::NAME, canon2::load);
    registry.register(dragon1::NAME, dragon1::load);
    registry.register(effect::NAME, effect::load);
    registry.register(explode5::NAME, explode5::load);
    registry.register(fly::NAME, fly::load);
    registry.register(follow::NAME, follow::load);
    registry.register(geyzer::NAME, geyzer::load);
    registry.register(gobelin::NAME, gobelin::load);
    registry.register(norka_walk::NAME, norka_walk::load);
    registry.register(plant::NAME, plant::load);
    registry.register(shooter::NAME, shooter::load);
    registry.register(spike::NAME, spike::load);
}

/// Catalog registry ready to load templates.
pub fn registry() -> FeatureRegistry {
    let mut registry = FeatureRegistry::new();
    register_all(&mut registry);
    registry
}

#[cfg(test)]
pub(crate) mod testing {
    use lionheart_engine::{EntityId, EventKind, FeatureEvent, Services, Stage, TemplateRegistry};

    /// Stage with the whole catalog and the given templates loaded.
    pub fn stage(templates: &[&str]) -> Stage {
        stage_with(templates, Services::new())
    }

    pub fn stage_with(templates: &[&str], services: Services) -> Stage {
        let mut registry = TemplateRegistry::new(super::registry());
        registry.load_all(templates.iter().copied()).unwrap();
        Stage::new(registry, services)
    }

    pub fn run(stage: &mut Stage, frames: u32) {
        for _ in 0..frames {
            stage.advance(1.0);
        }
    }

    /// Frames on which `id` produced an event of `kind`.
    pub fn frames_of(stage: &Stage, id: EntityId, kind: EventKind) -> Vec<u32> {
        stage
            .events_for(id)
            .iter()
            .filter(|event| event.is(kind))
            .map(|event| event.frame)
            .collect()
    }

    pub fn of_kind(events: &[FeatureEvent], kind: EventKind) -> Vec<FeatureEvent> {
        events.iter().filter(|event| event.is(kind)).copied().collect()
    }
}
