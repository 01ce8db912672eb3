//! Flying dragon crossing the screen: fires a configured number of shots,
//! then climbs away.
//!
//! The dragon keeps drifting right at all times but stays parked until a
//! per-placement `dragon1` node is loaded.

use std::rc::Rc;

use lionheart_engine::{
    decode_node, Animation, Blueprint, ConfigLoader, ConfigResult, ConfigSaver, Entity, Feature,
    FeatureContext, Launcher, PhaseMachine, Recyclable, Routine, Setup,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "dragon1";

const SPEED_X: f64 = 1.2;
const SPEED_Y: f64 = 0.7;
const START_DELAY_TICKS: f64 = 90.0;
const FIRED_DELAY_TICKS: f64 = 50.0;
const HEIGHT_LIMIT: f64 = 400.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dragon1Config {
    pub fired_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Parked,
    Start,
    Fire,
    MoveUp,
}

pub struct Dragon1 {
    template: Rc<str>,
    idle: Rc<Animation>,
    config: Option<Dragon1Config>,
    machine: PhaseMachine<Phase>,
    count: u32,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let idle = Rc::new(setup.animation("idle")?);
    let template: Rc<str> = Rc::from(setup.name.as_str());
    Ok(Blueprint::new(NAME, move || {
        Box::new(Dragon1 {
            template: Rc::clone(&template),
            idle: Rc::clone(&idle),
            config: None,
            machine: PhaseMachine::new(Phase::Parked),
            count: 0,
        })
    }))
}

impl Routine for Dragon1 {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        ctx.entity.move_location_x(extrp, SPEED_X);
        self.machine.begin_frame(extrp);
        match self.machine.phase() {
            Phase::Parked => {}
            Phase::Start => {
                if self.machine.tick().elapsed(START_DELAY_TICKS) {
                    self.machine.enter(Phase::Fire);
                    // first shot goes out on the next frame
                    self.machine.tick_mut().set(FIRED_DELAY_TICKS);
                }
            }
            Phase::Fire => {
                if !self.machine.tick().elapsed(FIRED_DELAY_TICKS) {
                    return;
                }
                let fired_count = self.config.as_ref().map_or(0, |config| config.fired_count);
                if self.count < fired_count {
                    if let Some(direction) = ctx.entity.launcher.as_ref().map(Launcher::direction) {
                        ctx.fire(direction);
                    }
                    self.count += 1;
                    self.machine.tick_mut().restart();
                } else {
                    self.machine.enter(Phase::MoveUp);
                }
            }
            Phase::MoveUp => {
                ctx.entity.move_location_y(extrp, SPEED_Y);
                if ctx.entity.pos.y > HEIGHT_LIMIT {
                    ctx.destroy();
                }
            }
        }
    }
}

impl Recyclable for Dragon1 {
    fn recycle(&mut self, entity: &mut Entity) {
        self.config = None;
        self.count = 0;
        self.machine.reset();
        entity.play(&self.idle);
    }
}

impl ConfigLoader for Dragon1 {
    fn load(&mut self, config: &Value) -> ConfigResult<()> {
        if let Some(node) = config.get(NAME) {
            self.config = Some(decode_node(&self.template, NAME, node)?);
            self.machine.reset();
            self.machine.enter(Phase::Start);
        }
        Ok(())
    }
}

impl ConfigSaver for Dragon1 {
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>> {
        match self.config.as_ref() {
            Some(config) => Ok(Some((NAME, serde_json::to_value(config)?))),
            None => Ok(None),
        }
    }
}

impl Feature for Dragon1 {
    fn name(&self) -> &'static str {
        NAME
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }

    fn loader(&mut self) -> Option<&mut dyn ConfigLoader> {
        Some(self)
    }

    fn saver(&self) -> Option<&dyn ConfigSaver> {
        Some(self)
    }
}
