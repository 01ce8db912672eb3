pub mod api;
pub mod assets;
pub mod components;
pub mod core;

// Re-export key types at crate root for convenience
pub use api::context::{Command, Commands, FeatureContext, Issued, Services, Tracked};
pub use api::error::{ConfigError, ConfigResult};
pub use api::feature::{
    AnimationListener, Blueprint, Capabilities, CollidableListener, ConfigLoader, ConfigSaver,
    Feature, FeatureLoader, FeatureRegistry, Recyclable, Routine, TileCollidableListener,
};
pub use api::types::{name_key, EntityId, EventKind, FeatureEvent, SoundEvent};
pub use assets::registry::{Template, TemplateRegistry};
pub use assets::setup::{decode_node, EntityPrototype, Setup};
pub use components::animation::{AnimState, AnimUpdate, Animation, Animator};
pub use components::collision::{names, Collidable, Collision, CollisionCategory, CollisionResult};
pub use components::entity::Entity;
pub use components::force::Force;
pub use components::launcher::Launcher;
pub use components::tilemap::{MapTile, Tile};
pub use crate::core::phase::{Guard, PhaseMachine, Transition};
pub use crate::core::scene::{Scene, Slot};
pub use crate::core::stage::Stage;
pub use crate::core::tick::Tick;
pub use crate::core::time::{FramePacer, FrameRate};
pub use crate::core::timeline::Timeline;
pub use crate::core::viewer::Viewer;
