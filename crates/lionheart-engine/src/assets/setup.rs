use std::collections::BTreeMap;

use glam::DVec2;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::error::{ConfigError, ConfigResult};
use crate::api::types::EntityId;
use crate::components::animation::{Animation, Animator};
use crate::components::collision::{Collidable, Collision};
use crate::components::entity::Entity;
use crate::components::launcher::Launcher;

/// Entity template as written in data files.
///
/// Known keys are parsed eagerly; any other key is kept as a feature node and
/// decoded on demand by the feature that owns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetupData {
    name: String,
    #[serde(default = "default_size")]
    size: [f64; 2],
    #[serde(default = "default_health")]
    health: i32,
    #[serde(default)]
    kinematic: bool,
    #[serde(default)]
    animations: BTreeMap<String, Animation>,
    #[serde(default)]
    collisions: Vec<Collision>,
    #[serde(default)]
    launcher: Option<Launcher>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(flatten)]
    nodes: Map<String, Value>,
}

fn default_size() -> [f64; 2] {
    [16.0, 16.0]
}

fn default_health() -> i32 {
    1
}

/// Parsed entity template.
#[derive(Debug, Clone)]
pub struct Setup {
    pub name: String,
    pub size: DVec2,
    pub health: i32,
    pub kinematic: bool,
    pub animations: BTreeMap<String, Animation>,
    pub collisions: Vec<Collision>,
    pub launcher: Option<Launcher>,
    /// Feature names in attachment order.
    pub features: Vec<String>,
    nodes: Map<String, Value>,
}

impl Setup {
    /// Parse a template from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let data: SetupData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let data: SetupData = serde_json::from_value(value)?;
        Self::from_data(data)
    }

    fn from_data(data: SetupData) -> ConfigResult<Self> {
        let mut animations = BTreeMap::new();
        for (name, mut anim) in data.animations {
            if let Some((attribute, reason)) = anim.defect() {
                return Err(ConfigError::Invalid {
                    template: data.name,
                    node: format!("animations.{}", name),
                    attribute: attribute.to_string(),
                    reason: reason.to_string(),
                });
            }
            anim.name = name.clone();
            animations.insert(name, anim);
        }
        Ok(Self {
            name: data.name,
            size: DVec2::new(data.size[0], data.size[1]),
            health: data.health,
            kinematic: data.kinematic,
            animations,
            collisions: data.collisions,
            launcher: data.launcher,
            features: data.features,
            nodes: data.nodes,
        })
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn raw_node(&self, node: &str) -> Option<&Value> {
        self.nodes.get(node)
    }

    /// Decode a required node.
    pub fn node<T: DeserializeOwned>(&self, node: &str) -> ConfigResult<T> {
        self.optional_node(node)?.ok_or_else(|| ConfigError::MissingNode {
            template: self.name.clone(),
            node: node.to_string(),
        })
    }

    /// Decode a node if present.
    pub fn optional_node<T: DeserializeOwned>(&self, node: &str) -> ConfigResult<Option<T>> {
        self.nodes
            .get(node)
            .map(|value| decode_node(&self.name, node, value))
            .transpose()
    }

    /// Decode a node, or use its default when absent.
    pub fn node_or_default<T: DeserializeOwned + Default>(&self, node: &str) -> ConfigResult<T> {
        Ok(self.optional_node(node)?.unwrap_or_default())
    }

    pub fn animation(&self, name: &str) -> ConfigResult<Animation> {
        self.animations
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::MissingAnimation {
                template: self.name.clone(),
                animation: name.to_string(),
            })
    }

    /// Build an `Invalid` error for this template.
    pub fn invalid(&self, node: &str, attribute: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            template: self.name.clone(),
            node: node.to_string(),
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    pub fn prototype(&self) -> EntityPrototype {
        EntityPrototype {
            tag: self.name.clone(),
            size: self.size,
            health: self.health,
            kinematic: self.kinematic,
            animated: !self.animations.is_empty(),
            collisions: self.collisions.clone(),
            launcher: self.launcher.clone(),
        }
    }
}

/// Decode one node of an override or saved object that is shaped like a template.
pub fn decode_node<T: DeserializeOwned>(template: &str, node: &str, value: &Value) -> ConfigResult<T> {
    T::deserialize(value).map_err(|source| ConfigError::Node {
        template: template.to_string(),
        node: node.to_string(),
        source,
    })
}

/// Entity state a template spawns with.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPrototype {
    pub tag: String,
    pub size: DVec2,
    pub health: i32,
    pub kinematic: bool,
    pub animated: bool,
    pub collisions: Vec<Collision>,
    pub launcher: Option<Launcher>,
}

impl EntityPrototype {
    pub fn instantiate(&self, id: EntityId, pos: DVec2, seed: u64) -> Entity {
        let mut entity = Entity::new(id)
            .with_tag(self.tag.clone())
            .with_pos(pos)
            .with_size(self.size)
            .with_health(self.health)
            .with_seed(seed)
            .with_kinematic(self.kinematic);
        if self.animated {
            entity.animator = Some(Animator::new());
        }
        if !self.collisions.is_empty() {
            entity.collidable = Some(Collidable::new(self.collisions.clone()));
        }
        entity.launcher = self.launcher.clone();
        entity
    }

    /// Bring a pooled entity back to its spawn state under a new identity.
    pub fn reset(&self, entity: &mut Entity, id: EntityId, pos: DVec2, seed: u64) {
        *entity = self.instantiate(id, pos, seed);
    }
}
