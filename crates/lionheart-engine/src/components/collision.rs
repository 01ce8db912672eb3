//! Collision vocabulary shared between the host and features.
//!
//! Detection itself belongs to the host; features only see region names
//! (entity vs entity) or tile categories per axis (entity vs map).

use serde::{Deserialize, Serialize};

/// Well-known region and tile group names.
pub mod names {
    pub const GROUND: &str = "ground";
    pub const SLOPE: &str = "slope";
    pub const INCLINE: &str = "incline";
    pub const BLOCK: &str = "block";
    pub const LEG: &str = "leg";
    pub const KNEE: &str = "knee";
    pub const BODY: &str = "body";
    pub const BITE: &str = "bite";
    pub const ATTACK: &str = "attack";
}

/// A named collision region on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collision {
    pub name: String,
}

impl Collision {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Collision membership of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Collidable {
    pub enabled: bool,
    pub regions: Vec<Collision>,
}

impl Collidable {
    pub fn new(regions: Vec<Collision>) -> Self {
        Self {
            enabled: true,
            regions,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_region(&self, name: &str) -> bool {
        self.regions.iter().any(|region| region.name == name)
    }
}

/// Tile-collision category of the entity part that touched the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionCategory {
    pub name: String,
}

impl CollisionCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Tile groups hit on each axis during one tile-collision check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionResult {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl CollisionResult {
    pub fn on_x(group: impl Into<String>) -> Self {
        Self {
            x: Some(group.into()),
            y: None,
        }
    }

    pub fn on_y(group: impl Into<String>) -> Self {
        Self {
            x: None,
            y: Some(group.into()),
        }
    }

    pub fn contains_x(&self, group: &str) -> bool {
        self.x.as_deref() == Some(group)
    }

    pub fn contains_y(&self, group: &str) -> bool {
        self.y.as_deref() == Some(group)
    }
}
