//! Stationary canon: fires, shows its fire animation briefly, waits, repeats.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    Animation, Blueprint, ConfigResult, Entity, Feature, FeatureContext, Guard, Launcher,
    PhaseMachine, Recyclable, Routine, Setup, Transition,
};
use serde::{Deserialize, Serialize};

use crate::sfx::Sfx;

pub const NAME: &str = "canon1";

/// Longest time the fire animation is held.
const FIRED_DELAY_MS: f64 = 250.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Canon1Config {
    /// Time between shots, in ms.
    pub fire_delay: f64,
    /// Launch direction scale per axis.
    pub vx: f64,
    pub vy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Fired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    Fire,
    Rest,
}

#[derive(Debug)]
struct Shared {
    config: Canon1Config,
    idle: Animation,
    fire: Animation,
    table: [Transition<Phase, Act>; 2],
}

pub struct Canon1 {
    shared: Rc<Shared>,
    machine: PhaseMachine<Phase>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let config: Canon1Config = setup.node(NAME)?;
    if config.fire_delay < 0.0 {
        return Err(setup.invalid(NAME, "fireDelay", "must not be negative"));
    }
    let table = [
        Transition::new(Phase::Idle, Guard::Millis(config.fire_delay), Phase::Fired, Act::Fire),
        Transition::new(
            Phase::Fired,
            Guard::Millis(FIRED_DELAY_MS.min(config.fire_delay)),
            Phase::Idle,
            Act::Rest,
        ),
    ];
    let shared = Rc::new(Shared {
        idle: setup.animation("idle")?,
        fire: setup.animation("fire")?,
        config,
        table,
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(Canon1 {
            shared: Rc::clone(&shared),
            machine: PhaseMachine::new(Phase::Idle),
        })
    }))
}

impl Routine for Canon1 {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.machine.begin_frame(extrp);
        let anim = ctx.entity.anim_state();
        match self.machine.step(&self.shared.table, anim, ctx.rate()) {
            Some(Act::Fire) => {
                ctx.entity.play(&self.shared.fire);
                let base = ctx
                    .entity
                    .launcher
                    .as_ref()
                    .map_or(DVec2::ZERO, Launcher::direction);
                let scale = DVec2::new(self.shared.config.vx, self.shared.config.vy);
                ctx.fire(base * scale);
                ctx.play(Sfx::MonsterCanon1);
            }
            Some(Act::Rest) => ctx.entity.play(&self.shared.idle),
            None => {}
        }
    }
}

impl Recyclable for Canon1 {
    fn recycle(&mut self, entity: &mut Entity) {
        entity.play(&self.shared.idle);
        self.machine.reset();
    }
}

impl Feature for Canon1 {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, entity: &Entity) {
        if entity.launcher.is_none() {
            log::warn!("`{}` uses {} without a launcher", entity.tag, NAME);
        }
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }
}
