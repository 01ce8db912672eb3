//! Boss intro: Norka rises, walks down to the arena floor and transforms.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    AnimState, Animation, Blueprint, ConfigResult, Entity, Feature, FeatureContext,
    PhaseMachine, Recyclable, Routine, Setup,
};

pub const NAME: &str = "norka_walk";

const WALK_SPEED: f64 = -0.15;
const FLOOR_Y: f64 = 80.0;
const TRANSFORM: &str = "NorkaTransform";
const TRANSFORM_AT: DVec2 = DVec2::new(210.0, 76.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Raise,
    Walk,
}

#[derive(Debug)]
struct Anims {
    idle: Animation,
    walk: Animation,
}

pub struct NorkaWalk {
    anims: Rc<Anims>,
    machine: PhaseMachine<Phase>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let anims = Rc::new(Anims {
        idle: setup.animation("idle")?,
        walk: setup.animation("walk")?,
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(NorkaWalk {
            anims: Rc::clone(&anims),
            machine: PhaseMachine::new(Phase::Raise),
        })
    }))
}

impl Routine for NorkaWalk {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.machine.begin_frame(extrp);
        match self.machine.phase() {
            Phase::Raise => {
                if ctx.entity.anim_state() == AnimState::Finished {
                    ctx.entity.play(&self.anims.walk);
                    self.machine.enter(Phase::Walk);
                }
            }
            Phase::Walk => {
                ctx.entity.move_location_y(extrp, WALK_SPEED);
                if ctx.entity.pos.y < FLOOR_Y {
                    ctx.spawn(TRANSFORM, TRANSFORM_AT);
                    ctx.destroy();
                }
            }
        }
    }
}

impl Recyclable for NorkaWalk {
    fn recycle(&mut self, entity: &mut Entity) {
        entity.play(&self.anims.idle);
        self.machine.reset();
    }
}

impl Feature for NorkaWalk {
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
