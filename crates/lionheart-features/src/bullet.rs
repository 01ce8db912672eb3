//! Projectile that bounces along the ground and turns around at walls.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    names, Blueprint, CollisionCategory, CollisionResult, ConfigResult, Entity, Feature,
    FeatureContext, Recyclable, Setup, TileCollidableListener,
};
use serde::Deserialize;

use crate::sfx::Sfx;

pub const NAME: &str = "bullet_bounce_on_ground";

const BOUNCE_MAX: f64 = 3.5;
/// Bounces below this height are silent.
const BOUNCE_AUDIBLE: f64 = 0.5;
const SLOPE_DRIFT: f64 = 0.35;
const INCLINE_DRIFT: f64 = 0.5;
const JUMP_VELOCITY: f64 = 0.1;
const JUMP_SENSIBILITY: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub sfx: Sfx,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            sfx: Sfx::ProjectileBounce,
        }
    }
}

pub struct BulletBounceOnGround {
    config: Rc<BulletConfig>,
    bounce_x: f64,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let config = Rc::new(setup.node_or_default::<BulletConfig>(NAME)?);
    Ok(Blueprint::new(NAME, move || {
        Box::new(BulletBounceOnGround {
            config: Rc::clone(&config),
            bounce_x: 0.0,
        })
    }))
}

impl BulletBounceOnGround {
    fn bounce(&mut self, result: &CollisionResult, ctx: &mut FeatureContext) {
        let entity = &mut *ctx.entity;
        let bounce = (entity.old_pos.y - entity.pos.y).clamp(0.0, BOUNCE_MAX);
        entity.teleport_y(entity.pos.y + 1.0);

        let drift = if result.contains_y(names::SLOPE) {
            Some(SLOPE_DRIFT)
        } else if result.contains_y(names::INCLINE) {
            Some(INCLINE_DRIFT)
        } else {
            None
        };
        if let Some(drift) = drift {
            self.bounce_x += drift;
            entity.jump.set_destination(DVec2::new(self.bounce_x, 0.0));
        }
        entity.jump.set_direction(DVec2::new(self.bounce_x, bounce));

        if bounce > BOUNCE_AUDIBLE && ctx.is_viewable() {
            ctx.play(self.config.sfx);
        }
    }

    fn turn_around(ctx: &mut FeatureContext) {
        let entity = &mut *ctx.entity;
        let side = if entity.pos.x > entity.old_pos.x { -2.0 } else { 1.0 };
        entity.teleport_x(entity.pos.x + side);

        let vx = entity.velocity.direction.x;
        let vy = entity.velocity.direction.y;
        entity.velocity.set_direction(DVec2::new(-vx, vy));
        entity.velocity.set_destination(DVec2::new(-vx, 0.0));
    }
}

impl TileCollidableListener for BulletBounceOnGround {
    fn notify_tile_collided(
        &mut self,
        result: &CollisionResult,
        category: &CollisionCategory,
        ctx: &mut FeatureContext,
    ) {
        if category.name.contains(names::LEG) {
            let grounded = [names::GROUND, names::SLOPE, names::INCLINE, names::BLOCK]
                .into_iter()
                .any(|group| result.contains_y(group));
            if grounded {
                self.bounce(result, ctx);
            }
        } else if category.name.starts_with(names::KNEE) {
            Self::turn_around(ctx);
        }
    }
}

impl Recyclable for BulletBounceOnGround {
    fn recycle(&mut self, entity: &mut Entity) {
        self.bounce_x = 0.0;
        entity.jump.velocity = JUMP_VELOCITY;
        entity.jump.sensibility = JUMP_SENSIBILITY;
        entity.jump.zero();
    }
}

impl Feature for BulletBounceOnGround {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }

    fn tile_listener(&mut self) -> Option<&mut dyn TileCollidableListener> {
        Some(self)
    }
}
