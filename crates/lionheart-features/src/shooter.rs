//! Configurable turret: waits, optionally plays its attack animation, fires
//! on a given frame of it, then rests.
//!
//! The whole behavior comes from the `shooter` node, either in the template
//! (shared default) or in a per-placement override. Without one the shooter
//! stays inert.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    decode_node, AnimState, Animation, Blueprint, ConfigLoader, ConfigResult, ConfigSaver, Entity,
    Feature, FeatureContext, Force, Launcher, PhaseMachine, Recyclable, Routine, Setup,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "shooter";

/// Speed of shots aimed at the tracked target.
const TRACK_SPEED: f64 = 0.25;
const SHOT_DAMPING: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShooterConfig {
    /// Wait before each shot, in ms. The first wait is halved.
    pub fire_delay: f64,
    /// Rest after each shot, in ms. Zero skips the rest phase.
    #[serde(default)]
    pub fired_delay: f64,
    /// Launch direction scale.
    pub svx: f64,
    pub svy: f64,
    /// Direction the shot eases toward; each axis falls back to its launch scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dvx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dvy: Option<f64>,
    /// Attack frame that releases the shot; zero fires without animating.
    #[serde(default)]
    pub anim: u32,
    /// Aim at the tracked target instead of the launcher direction.
    #[serde(default)]
    pub track: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prepare,
    Fire,
    CheckAnimEnd,
    Fired,
}

#[derive(Debug)]
struct Shared {
    template: String,
    default: Option<Rc<ShooterConfig>>,
    patrol: Animation,
    attack: Animation,
}

pub struct Shooter {
    shared: Rc<Shared>,
    config: Option<Rc<ShooterConfig>>,
    machine: PhaseMachine<Phase>,
    /// Head start applied to the first wait once the frame rate is known.
    head_start_ms: Option<f64>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let shared = Rc::new(Shared {
        template: setup.name.clone(),
        default: setup.optional_node::<ShooterConfig>(NAME)?.map(Rc::new),
        patrol: setup.animation("patrol")?,
        attack: setup.animation("attack")?,
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(Shooter {
            shared: Rc::clone(&shared),
            config: None,
            machine: PhaseMachine::new(Phase::Prepare),
            head_start_ms: None,
        })
    }))
}

impl Shooter {
    fn configure(&mut self, config: Option<Rc<ShooterConfig>>) {
        self.head_start_ms = config.as_ref().map(|config| config.fire_delay / 2.0);
        self.config = config;
        self.machine.reset();
    }

    fn launch(config: &ShooterConfig, ctx: &mut FeatureContext) {
        if config.track {
            ctx.fire_at(TRACK_SPEED);
            return;
        }
        let base = ctx
            .entity
            .launcher
            .as_ref()
            .map_or(DVec2::ZERO, Launcher::direction);
        let mut force =
            Force::new(base * DVec2::new(config.svx, config.svy)).with_velocity(SHOT_DAMPING);
        let destination = DVec2::new(
            config.dvx.unwrap_or(config.svx),
            config.dvy.unwrap_or(config.svy),
        );
        force.set_destination(base * destination);
        ctx.fire_with(force);
    }

    fn rest_or_prepare(&mut self, config: &ShooterConfig, ctx: &mut FeatureContext) {
        if config.fired_delay > 0.0 {
            self.machine.enter(Phase::Fired);
        } else {
            ctx.entity.play(&self.shared.patrol);
            self.machine.enter(Phase::Prepare);
        }
    }
}

impl Routine for Shooter {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        let Some(config) = self.config.clone() else {
            return;
        };
        if ctx.entity.health <= 0 {
            return;
        }
        if let Some(ms) = self.head_start_ms.take() {
            self.machine.tick_mut().set(ctx.rate().ms_to_ticks(ms));
        }
        self.machine.begin_frame(extrp);
        let rate = ctx.rate();
        let anim = ctx.entity.anim_state();

        match self.machine.phase() {
            Phase::Prepare => {
                let ready = matches!(anim, AnimState::Finished | AnimState::Stopped)
                    || ctx.entity.anim_frame() == 1;
                if ready && self.machine.tick().elapsed_time(rate, config.fire_delay) {
                    if config.anim > 0 {
                        ctx.entity.play(&self.shared.attack);
                    }
                    self.machine.enter(Phase::Fire);
                }
            }
            Phase::Fire => {
                if config.anim == 0 || ctx.entity.anim_frame() == config.anim {
                    Self::launch(&config, ctx);
                    if config.anim > 0 {
                        self.machine.enter(Phase::CheckAnimEnd);
                    } else if config.fired_delay > 0.0 {
                        self.machine.enter(Phase::Fired);
                    } else {
                        self.machine.enter(Phase::Prepare);
                    }
                }
            }
            Phase::CheckAnimEnd => {
                if anim == AnimState::Finished {
                    self.rest_or_prepare(&config, ctx);
                }
            }
            Phase::Fired => {
                if self.machine.tick().elapsed_time(rate, config.fired_delay) {
                    ctx.entity.play(&self.shared.patrol);
                    self.machine.enter(Phase::Prepare);
                }
            }
        }
    }
}

impl Recyclable for Shooter {
    fn recycle(&mut self, entity: &mut Entity) {
        entity.play(&self.shared.patrol);
        self.configure(self.shared.default.clone());
    }
}

impl ConfigLoader for Shooter {
    fn load(&mut self, config: &Value) -> ConfigResult<()> {
        if let Some(node) = config.get(NAME) {
            let parsed: ShooterConfig = decode_node(&self.shared.template, NAME, node)?;
            self.configure(Some(Rc::new(parsed)));
        }
        Ok(())
    }
}

impl ConfigSaver for Shooter {
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>> {
        match self.config.as_deref() {
            Some(config) => Ok(Some((NAME, serde_json::to_value(config)?))),
            None => Ok(None),
        }
    }
}

impl Feature for Shooter {
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

    fn loader(&mut self) -> Option<&mut dyn ConfigLoader> {
        Some(self)
    }

    fn saver(&self) -> Option<&dyn ConfigSaver> {
        Some(self)
    }
}
