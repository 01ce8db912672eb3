//! Walker that keeps within reach of the tracked target.
//!
//! The feature only sets the entity's `steer`; the host movement model turns it
//! into motion.

use lionheart_engine::{Blueprint, ConfigResult, Feature, FeatureContext, Routine, Setup};

pub const NAME: &str = "follow";

/// Lead the target may take to the right before the walker follows.
const REACH_RIGHT: f64 = 80.0;
const REACH_LEFT: f64 = -96.0;

#[derive(Debug, Default)]
pub struct Follow;

pub fn load(_setup: &Setup) -> ConfigResult<Blueprint> {
    Ok(Blueprint::new(NAME, || Box::new(Follow)))
}

impl Routine for Follow {
    fn update(&mut self, _extrp: f64, ctx: &mut FeatureContext) {
        let Some(target) = ctx.target() else {
            return;
        };
        let lead = target.pos.x - ctx.entity.pos.x;
        ctx.entity.steer = if lead > REACH_RIGHT {
            1.0
        } else if lead < REACH_LEFT {
            -1.0
        } else {
            0.0
        };
    }
}

impl Feature for Follow {
    fn name(&self) -> &'static str {
        NAME
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::testing::{run, stage};

    const SHADE: &str = r#"{ "name": "Shade", "features": ["follow"] }"#;
    const PLAYER: &str = r#"{ "name": "Player" }"#;

    #[test]
    fn steers_toward_distant_target() {
        let mut stage = stage(&[SHADE, PLAYER]);
        let shade = stage.spawn("Shade", DVec2::ZERO).unwrap();
        let player = stage.spawn("Player", DVec2::new(50.0, 0.0)).unwrap();

        run(&mut stage, 1);
        assert_eq!(stage.entity(shade).unwrap().steer, 0.0);

        stage.track(player);
        let steer_at = |stage: &mut lionheart_engine::Stage, x: f64| {
            stage.entity_mut(player).unwrap().pos.x = x;
            run(stage, 1);
            stage.entity(shade).unwrap().steer
        };
        assert_eq!(steer_at(&mut stage, 81.0), 1.0);
        assert_eq!(steer_at(&mut stage, 80.0), 0.0);
        assert_eq!(steer_at(&mut stage, -96.0), 0.0);
        assert_eq!(steer_at(&mut stage, -97.0), -1.0);
    }
}
