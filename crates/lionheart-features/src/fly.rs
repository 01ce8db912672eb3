//! Flying creature homing in on the tracked target along a smoothed course.

use glam::DVec2;
use lionheart_engine::{
    Blueprint, ConfigResult, Entity, Feature, FeatureContext, Force, Recyclable, Routine, Setup,
};

pub const NAME: &str = "fly";

const SPEED: f64 = 1.1;
const TURN_VELOCITY: f64 = 0.04;
const TURN_SENSIBILITY: f64 = 0.01;

pub struct Fly {
    course: Force,
}

pub fn load(_setup: &Setup) -> ConfigResult<Blueprint> {
    Ok(Blueprint::new(NAME, || {
        Box::new(Fly {
            course: Force::new(DVec2::ZERO)
                .with_velocity(TURN_VELOCITY)
                .with_sensibility(TURN_SENSIBILITY),
        })
    }))
}

/// Unit-ish step toward `delta`: components are scaled down together until
/// neither exceeds one.
fn heading(delta: DVec2) -> DVec2 {
    let longest = delta.x.abs().max(delta.y.abs());
    if longest >= 1.0 {
        delta / longest.ceil()
    } else {
        delta
    }
}

impl Routine for Fly {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        let Some(target) = ctx.target() else {
            return;
        };
        let delta = target.pos - ctx.entity.old_pos;
        self.course.set_destination(heading(delta) * SPEED);
        self.course.update(extrp);
        ctx.entity.move_location(extrp, self.course.direction);
    }
}

impl Recyclable for Fly {
    fn recycle(&mut self, _entity: &mut Entity) {
        self.course.zero();
    }
}

impl Feature for Fly {
    fn name(&self) -> &'static str {
        NAME
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{run, stage};

    const FLY: &str = r#"{ "name": "Fly", "features": ["fly"] }"#;
    const PLAYER: &str = r#"{ "name": "Player" }"#;

    #[test]
    fn heading_is_bounded() {
        assert_eq!(heading(DVec2::new(100.0, -50.0)), DVec2::new(1.0, -0.5));
        assert_eq!(heading(DVec2::new(0.5, 0.25)), DVec2::new(0.5, 0.25));
        assert_eq!(heading(DVec2::new(1.5, 0.0)), DVec2::new(0.75, 0.0));
    }

    #[test]
    fn accelerates_toward_target() {
        let mut stage = stage(&[FLY, PLAYER]);
        let fly = stage.spawn("Fly", DVec2::ZERO).unwrap();
        let player = stage.spawn("Player", DVec2::new(100.0, 0.0)).unwrap();

        run(&mut stage, 10);
        assert_eq!(stage.entity(fly).unwrap().pos, DVec2::ZERO);

        stage.track(player);
        run(&mut stage, 1);
        let first = stage.entity(fly).unwrap().pos.x;
        assert!((first - 0.04).abs() < 1e-9);
        run(&mut stage, 1);
        let second = stage.entity(fly).unwrap().pos.x;
        assert!((second - first - 0.08).abs() < 1e-9);

        run(&mut stage, 100);
        let fly = stage.entity(fly).unwrap();
        assert!(fly.pos.x > 50.0);
        assert_eq!(fly.pos.y, 0.0);
    }
}
