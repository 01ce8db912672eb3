//! Spike trap cycling out, holding, retracting and holding again.
//!
//! The spike only hurts while its sheet shows a frame past the first
//! animation.

use std::rc::Rc;

use lionheart_engine::{
    decode_node, AnimationListener, Animation, Blueprint, ConfigLoader, ConfigResult, ConfigSaver,
    Entity, Feature, FeatureContext, Guard, PhaseMachine, Recyclable, Routine, Setup, Transition,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME: &str = "spike";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Hold time between animations, in ms.
    pub delay: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self { delay: 2500.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Rising,
    Out,
    Retracting,
    In,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    Hold,
    Retract,
    Raise,
}

fn table(delay: f64) -> [Transition<Phase, Act>; 5] {
    [
        Transition::new(Phase::Rising, Guard::AnimFinished, Phase::Out, Act::Hold),
        Transition::new(Phase::Out, Guard::Millis(delay), Phase::Retracting, Act::Retract),
        Transition::new(Phase::Retracting, Guard::AnimFinished, Phase::In, Act::Hold),
        Transition::new(Phase::In, Guard::Millis(delay), Phase::Reset, Act::Raise),
        Transition::new(Phase::Reset, Guard::AnimFinished, Phase::Rising, Act::Hold),
    ]
}

#[derive(Debug)]
struct Shared {
    template: String,
    default: Option<SpikeConfig>,
    phase1: Animation,
    phase2: Animation,
    phase3: Animation,
}

pub struct Spike {
    shared: Rc<Shared>,
    config: Option<SpikeConfig>,
    machine: PhaseMachine<Phase>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let shared = Rc::new(Shared {
        template: setup.name.clone(),
        default: setup.optional_node::<SpikeConfig>(NAME)?,
        phase1: setup.animation("phase1")?,
        phase2: setup.animation("phase2")?,
        phase3: setup.animation("phase3")?,
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(Spike {
            shared: Rc::clone(&shared),
            config: None,
            machine: PhaseMachine::new(Phase::Rising),
        })
    }))
}

impl Spike {
    fn delay(&self) -> f64 {
        self.config
            .as_ref()
            .map_or_else(|| SpikeConfig::default().delay, |config| config.delay)
    }
}

impl Routine for Spike {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.machine.begin_frame(extrp);
        let table = table(self.delay());
        match self.machine.step(&table, ctx.entity.anim_state(), ctx.rate()) {
            Some(Act::Retract) => ctx.entity.play(&self.shared.phase2),
            Some(Act::Raise) => {
                let phase3 = &self.shared.phase3;
                ctx.entity.play(phase3);
                if let Some(animator) = ctx.entity.animator.as_mut() {
                    animator.set_frame(phase3.last);
                }
            }
            Some(Act::Hold) | None => {}
        }
    }
}

impl AnimationListener for Spike {
    fn notify_anim_frame(&mut self, frame: u32, ctx: &mut FeatureContext) {
        ctx.entity
            .set_collidable_enabled(frame > self.shared.phase1.last);
    }
}

impl Recyclable for Spike {
    fn recycle(&mut self, entity: &mut Entity) {
        self.config = self.shared.default.clone();
        self.machine.reset();
        entity.play(&self.shared.phase1);
        entity.set_collidable_enabled(false);
    }
}

impl ConfigLoader for Spike {
    fn load(&mut self, config: &Value) -> ConfigResult<()> {
        if let Some(node) = config.get(NAME) {
            self.config = Some(decode_node(&self.shared.template, NAME, node)?);
        }
        Ok(())
    }
}

impl ConfigSaver for Spike {
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>> {
        match self.config.as_ref() {
            Some(config) => Ok(Some((NAME, serde_json::to_value(config)?))),
            None => Ok(None),
        }
    }
}

impl Feature for Spike {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, entity: &Entity) {
        if entity.collidable.is_none() {
            log::warn!("`{}` uses {} without collisions", entity.tag, NAME);
        }
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }

    fn animation_listener(&mut self) -> Option<&mut dyn AnimationListener> {
        Some(self)
    }

    fn loader(&mut self) -> Option<&mut dyn ConfigLoader> {
        Some(self)
    }

    fn saver(&self) -> Option<&dyn ConfigSaver> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use lionheart_engine::{EntityId, Stage};
    use serde_json::json;

    use crate::testing::{run, stage};

    const SPIKE: &str = r#"{
        "name": "Spike",
        "animations": {
            "phase1": { "first": 1, "last": 2, "speed": 0.5 },
            "phase2": { "first": 3, "last": 4, "speed": 0.5 },
            "phase3": { "first": 1, "last": 4, "speed": 1.0, "reverse": true }
        },
        "collisions": ["spike"],
        "features": ["spike"],
        "spike": { "delay": 100 }
    }"#;

    fn armed(stage: &Stage, id: EntityId) -> bool {
        let spike = stage.entity(id).unwrap();
        spike.collidable.as_ref().unwrap().enabled
    }

    fn showing(stage: &Stage, id: EntityId) -> String {
        let spike = stage.entity(id).unwrap();
        spike.animator.as_ref().unwrap().current().unwrap().to_string()
    }

    #[test]
    fn dangerous_only_while_out() {
        let mut stage = stage(&[SPIKE]);
        let id = stage.spawn("Spike", DVec2::ZERO).unwrap();
        assert!(!armed(&stage, id));

        // rising ends on frame 4, the hold lasts 6 frames
        run(&mut stage, 11);
        assert_eq!(showing(&stage, id), "phase2");
        assert!(!armed(&stage, id));

        run(&mut stage, 1);
        assert!(armed(&stage, id));

        // phase2 ends on frame 14, second hold until frame 21
        run(&mut stage, 9);
        assert_eq!(showing(&stage, id), "phase3");
        run(&mut stage, 1);
        assert!(armed(&stage, id));
        run(&mut stage, 1);
        assert!(!armed(&stage, id));
    }

    #[test]
    fn default_hold_is_long() {
        let plain = SPIKE.replace(r#""spike": { "delay": 100 }"#, r#""health": 1"#);
        let mut stage = stage(&[plain.as_str()]);
        let id = stage.spawn("Spike", DVec2::ZERO).unwrap();
        run(&mut stage, 154);
        assert_eq!(showing(&stage, id), "phase1");
        run(&mut stage, 1);
        assert_eq!(showing(&stage, id), "phase2");
        assert_eq!(stage.save(id).unwrap(), Some(json!({})));
    }

    #[test]
    fn override_is_saved() {
        let mut stage = stage(&[SPIKE]);
        let node = json!({ "spike": { "delay": 400.0 } });
        let id = stage.spawn_with("Spike", DVec2::ZERO, &node).unwrap().unwrap();
        assert_eq!(stage.save(id).unwrap(), Some(node));
    }
}
