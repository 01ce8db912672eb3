//! Canon with a per-placement fire rate. Inert until it has a configuration.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    decode_node, Blueprint, ConfigLoader, ConfigResult, ConfigSaver, Entity, Feature,
    FeatureContext, Force, Launcher, Recyclable, Routine, Setup, Tick,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "canon2";

/// Rate at which the launch's vertical component fades.
const VERTICAL_DAMPING: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Canon2Config {
    /// Time between shots, in ms.
    pub fire_delay: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
}

pub struct Canon2 {
    template: Rc<str>,
    default: Option<Rc<Canon2Config>>,
    config: Option<Rc<Canon2Config>>,
    tick: Tick,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let default = setup.optional_node::<Canon2Config>(NAME)?.map(Rc::new);
    let template: Rc<str> = Rc::from(setup.name.as_str());
    Ok(Blueprint::new(NAME, move || {
        Box::new(Canon2 {
            template: Rc::clone(&template),
            default: default.clone(),
            config: None,
            tick: Tick::new(),
        })
    }))
}

impl Canon2 {
    fn launch_force(config: &Canon2Config, launcher: Option<&Launcher>) -> Force {
        let base = launcher.map_or(DVec2::ZERO, Launcher::direction);
        let direction = DVec2::new(base.x * config.vx, base.y * config.vy);
        let mut force = Force::new(direction).with_velocity(VERTICAL_DAMPING);
        force.set_destination(DVec2::new(direction.x, 0.0));
        force
    }
}

impl Routine for Canon2 {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        self.tick.update(extrp);
        if self.tick.elapsed_time(ctx.rate(), config.fire_delay) {
            let force = Self::launch_force(config, ctx.entity.launcher.as_ref());
            ctx.fire_with(force);
            self.tick.restart();
        }
    }
}

impl Recyclable for Canon2 {
    fn recycle(&mut self, _entity: &mut Entity) {
        self.config = self.default.clone();
        self.tick.restart();
    }
}

impl ConfigLoader for Canon2 {
    fn load(&mut self, config: &Value) -> ConfigResult<()> {
        if let Some(node) = config.get(NAME) {
            let parsed: Canon2Config = decode_node(&self.template, NAME, node)?;
            self.config = Some(Rc::new(parsed));
            self.tick.restart();
        }
        Ok(())
    }
}

impl ConfigSaver for Canon2 {
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>> {
        match self.config.as_deref() {
            Some(config) => Ok(Some((NAME, serde_json::to_value(config)?))),
            None => Ok(None),
        }
    }
}

impl Feature for Canon2 {
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
