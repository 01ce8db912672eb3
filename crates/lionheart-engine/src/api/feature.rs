use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::api::context::FeatureContext;
use crate::api::error::{ConfigError, ConfigResult};
use crate::assets::setup::Setup;
use crate::components::animation::AnimState;
use crate::components::collision::{Collision, CollisionCategory, CollisionResult};
use crate::components::entity::Entity;

/// Per-frame behavior.
pub trait Routine {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext);
}

/// Reset to the just-spawned state when the owning entity is (re)spawned.
pub trait Recyclable {
    fn recycle(&mut self, entity: &mut Entity);
}

/// Receives entity-vs-entity collisions.
///
/// `with` is the region of the owning entity, `by` the region of `other`.
pub trait CollidableListener {
    fn notify_collided(
        &mut self,
        other: &mut Entity,
        with: &Collision,
        by: &Collision,
        ctx: &mut FeatureContext,
    );
}

/// Receives entity-vs-map collisions.
pub trait TileCollidableListener {
    fn notify_tile_collided(
        &mut self,
        result: &CollisionResult,
        category: &CollisionCategory,
        ctx: &mut FeatureContext,
    );
}

/// Receives animator notifications for the owning entity.
pub trait AnimationListener {
    fn notify_anim_frame(&mut self, _frame: u32, _ctx: &mut FeatureContext) {}

    fn notify_anim_state(&mut self, _state: AnimState, _ctx: &mut FeatureContext) {}
}

/// Applies a per-entity configuration override after recycle.
pub trait ConfigLoader {
    /// `config` is a template-shaped object; a loader reads only its own node.
    fn load(&mut self, config: &Value) -> ConfigResult<()>;
}

/// Writes the current configuration back as a named node.
pub trait ConfigSaver {
    /// `None` when there is nothing to save.
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>>;
}

/// Presence bitset of the capability traits a feature implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const ROUTINE: Capabilities = Capabilities(1 << 0);
    pub const RECYCLABLE: Capabilities = Capabilities(1 << 1);
    pub const COLLIDABLE_LISTENER: Capabilities = Capabilities(1 << 2);
    pub const TILE_LISTENER: Capabilities = Capabilities(1 << 3);
    pub const ANIMATION_LISTENER: Capabilities = Capabilities(1 << 4);
    pub const LOADER: Capabilities = Capabilities(1 << 5);
    pub const SAVER: Capabilities = Capabilities(1 << 6);

    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Capabilities) {
        self.0 |= other.0;
    }

    pub fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A unit of behavior attached to an entity.
///
/// Capabilities are discovered through the accessors: a feature overrides the
/// ones it implements and returns `Some(self)`.
pub trait Feature {
    /// Node name the feature is registered under.
    fn name(&self) -> &'static str;

    /// One-time wiring after construction. The entity passed here is the
    /// first incarnation; per-spawn state belongs in [`Recyclable::recycle`].
    fn prepare(&mut self, _entity: &Entity) {}

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        None
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        None
    }

    fn collidable_listener(&mut self) -> Option<&mut dyn CollidableListener> {
        None
    }

    fn tile_listener(&mut self) -> Option<&mut dyn TileCollidableListener> {
        None
    }

    fn animation_listener(&mut self) -> Option<&mut dyn AnimationListener> {
        None
    }

    fn loader(&mut self) -> Option<&mut dyn ConfigLoader> {
        None
    }

    fn saver(&self) -> Option<&dyn ConfigSaver> {
        None
    }

    fn capabilities(&mut self) -> Capabilities {
        let mut caps = Capabilities::NONE;
        if self.routine().is_some() {
            caps.insert(Capabilities::ROUTINE);
        }
        if self.recyclable().is_some() {
            caps.insert(Capabilities::RECYCLABLE);
        }
        if self.collidable_listener().is_some() {
            caps.insert(Capabilities::COLLIDABLE_LISTENER);
        }
        if self.tile_listener().is_some() {
            caps.insert(Capabilities::TILE_LISTENER);
        }
        if self.animation_listener().is_some() {
            caps.insert(Capabilities::ANIMATION_LISTENER);
        }
        if self.loader().is_some() {
            caps.insert(Capabilities::LOADER);
        }
        if self.saver().is_some() {
            caps.insert(Capabilities::SAVER);
        }
        caps
    }
}

/// Per-template feature constructor.
///
/// Built once when the template is loaded; every `build` shares the parsed
/// configuration captured by the closure.
pub struct Blueprint {
    name: &'static str,
    build: Box<dyn Fn() -> Box<dyn Feature>>,
}

impl Blueprint {
    pub fn new<F>(name: &'static str, build: F) -> Self
    where
        F: Fn() -> Box<dyn Feature> + 'static,
    {
        Self {
            name,
            build: Box::new(build),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn build(&self) -> Box<dyn Feature> {
        (self.build)()
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint").field("name", &self.name).finish()
    }
}

/// Parses a feature's configuration out of a template.
pub type FeatureLoader = fn(&Setup) -> ConfigResult<Blueprint>;

/// Feature name to loader.
#[derive(Default)]
pub struct FeatureRegistry {
    loaders: HashMap<String, FeatureLoader>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader. A second registration under the same name replaces the first.
    pub fn register(&mut self, name: &str, loader: FeatureLoader) {
        if self.loaders.insert(name.to_string(), loader).is_some() {
            log::warn!("feature `{}` registered twice, keeping the last one", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Build the blueprint of feature `name` for `setup`.
    pub fn blueprint(&self, setup: &Setup, name: &str) -> ConfigResult<Blueprint> {
        let loader = self
            .loaders
            .get(name)
            .ok_or_else(|| ConfigError::UnknownFeature {
                template: setup.name.clone(),
                feature: name.to_string(),
            })?;
        loader(setup)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: u32,
    }

    impl Routine for Counter {
        fn update(&mut self, _extrp: f64, _ctx: &mut FeatureContext) {
            self.count += 1;
        }
    }

    impl Recyclable for Counter {
        fn recycle(&mut self, _entity: &mut Entity) {
            self.count = 0;
        }
    }

    impl Feature for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn routine(&mut self) -> Option<&mut dyn Routine> {
            Some(self)
        }

        fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
            Some(self)
        }
    }

    fn counter(_setup: &Setup) -> ConfigResult<Blueprint> {
        Ok(Blueprint::new("counter", || Box::new(Counter { count: 0 })))
    }

    #[test]
    fn capabilities_follow_accessors() {
        let mut feature = Counter { count: 0 };
        let caps = feature.capabilities();
        assert!(caps.contains(Capabilities::ROUTINE));
        assert!(caps.contains(Capabilities::RECYCLABLE));
        assert!(caps.contains(Capabilities::ROUTINE.union(Capabilities::RECYCLABLE)));
        assert!(!caps.contains(Capabilities::COLLIDABLE_LISTENER));
        assert!(!caps.contains(Capabilities::SAVER));
    }

    #[test]
    fn registry_builds_known_features() {
        let mut registry = FeatureRegistry::new();
        registry.register("counter", counter);
        let setup = Setup::from_json(r#"{ "name": "Thing", "features": ["counter"] }"#).unwrap();

        let blueprint = registry.blueprint(&setup, "counter").unwrap();
        assert_eq!(blueprint.name(), "counter");
        assert_eq!(blueprint.build().name(), "counter");
    }

    #[test]
    fn unknown_feature_is_config_error() {
        let registry = FeatureRegistry::new();
        let setup = Setup::from_json(r#"{ "name": "Thing" }"#).unwrap();
        let err = registry.blueprint(&setup, "nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFeature { ref feature, .. } if feature == "nope"));
    }
}
