//! Lava geyser: after an optional first delay, alternately rises to its
//! height and sinks back to where it was placed.

use std::rc::Rc;

use lionheart_engine::{
    decode_node, Blueprint, ConfigLoader, ConfigResult, ConfigSaver, Entity, Feature,
    FeatureContext, Guard, PhaseMachine, Recyclable, Routine, Setup, Transition,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sfx::Sfx;

pub const NAME: &str = "geyzer";

/// Vertical speed in px per tick.
const SPEED: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeyzerConfig {
    /// Wait before the first cycle, in ms.
    #[serde(default)]
    pub delay_first: f64,
    /// Rest time before each eruption, in ms.
    pub delay_start: f64,
    /// Eruption time, in ms.
    pub delay_down: f64,
    /// Eruption height in px.
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    First,
    Rest,
    Erupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    Wake,
    Erupt,
    Settle,
}

fn table(config: &GeyzerConfig) -> [Transition<Phase, Act>; 3] {
    [
        Transition::new(Phase::First, Guard::Millis(config.delay_first), Phase::Rest, Act::Wake),
        Transition::new(Phase::Rest, Guard::Millis(config.delay_start), Phase::Erupt, Act::Erupt),
        Transition::new(Phase::Erupt, Guard::Millis(config.delay_down), Phase::Rest, Act::Settle),
    ]
}

pub struct Geyzer {
    template: Rc<str>,
    default: Option<Rc<GeyzerConfig>>,
    config: Option<Rc<GeyzerConfig>>,
    machine: PhaseMachine<Phase>,
    base_y: f64,
    current: f64,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let default = setup.optional_node::<GeyzerConfig>(NAME)?.map(Rc::new);
    let template: Rc<str> = Rc::from(setup.name.as_str());
    Ok(Blueprint::new(NAME, move || {
        Box::new(Geyzer {
            template: Rc::clone(&template),
            default: default.clone(),
            config: None,
            machine: PhaseMachine::new(Phase::First),
            base_y: 0.0,
            current: 0.0,
        })
    }))
}

impl Routine for Geyzer {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        let Some(config) = self.config.clone() else {
            return;
        };
        self.machine.begin_frame(extrp);
        let table = table(&config);
        if let Some(Act::Erupt) = self.machine.step(&table, ctx.entity.anim_state(), ctx.rate()) {
            if ctx.is_viewable() {
                ctx.play(Sfx::SceneryGeyzer);
            }
        }

        match self.machine.phase() {
            Phase::Erupt if self.current < config.height => self.current += SPEED,
            Phase::Rest if self.current > 0.0 => self.current -= SPEED,
            _ => return,
        }
        ctx.entity.pos.y = self.base_y + self.current;
    }
}

impl Recyclable for Geyzer {
    fn recycle(&mut self, entity: &mut Entity) {
        self.config = self.default.clone();
        self.machine.reset();
        self.base_y = entity.pos.y;
        self.current = 0.0;
    }
}

impl ConfigLoader for Geyzer {
    fn load(&mut self, config: &Value) -> ConfigResult<()> {
        if let Some(node) = config.get(NAME) {
            let parsed: GeyzerConfig = decode_node(&self.template, NAME, node)?;
            self.config = Some(Rc::new(parsed));
        }
        Ok(())
    }
}

impl ConfigSaver for Geyzer {
    fn save(&self) -> ConfigResult<Option<(&'static str, Value)>> {
        match self.config.as_deref() {
            Some(config) => Ok(Some((NAME, serde_json::to_value(config)?))),
            None => Ok(None),
        }
    }
}

impl Feature for Geyzer {
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

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use lionheart_engine::{EntityId, EventKind, Stage};
    use serde_json::json;

    use crate::testing::{frames_of, run, stage};

    const GEYZER: &str = r#"{ "name": "Geyzer", "features": ["geyzer"] }"#;

    fn node() -> serde_json::Value {
        json!({ "geyzer": {
            "delayFirst": 0.0, "delayStart": 100.0, "delayDown": 100.0, "height": 9.0
        } })
    }

    fn y(stage: &Stage, id: EntityId) -> f64 {
        stage.entity(id).unwrap().pos.y
    }

    #[test]
    fn erupts_and_sinks() {
        let mut stage = stage(&[GEYZER]);
        let id = stage.spawn_with("Geyzer", DVec2::new(0.0, 20.0), &node()).unwrap().unwrap();

        run(&mut stage, 6);
        assert_eq!(y(&stage, id), 20.0);
        run(&mut stage, 3);
        assert_eq!(y(&stage, id), 29.0);
        run(&mut stage, 3);
        assert_eq!(y(&stage, id), 29.0);
        run(&mut stage, 3);
        assert_eq!(y(&stage, id), 20.0);

        run(&mut stage, 10);
        assert_eq!(frames_of(&stage, id, EventKind::Sound), vec![7, 19]);
        assert_eq!(stage.save(id).unwrap(), Some(node()));
    }

    #[test]
    fn silent_off_screen() {
        let mut stage = stage(&[GEYZER]);
        let id = stage.spawn_with("Geyzer", DVec2::new(1000.0, 0.0), &node()).unwrap().unwrap();
        run(&mut stage, 9);
        assert!(frames_of(&stage, id, EventKind::Sound).is_empty());
        assert_eq!(y(&stage, id), 9.0);
    }

    #[test]
    fn first_delay_postpones_cycle() {
        let mut stage = stage(&[GEYZER]);
        let mut late = node();
        late["geyzer"]["delayFirst"] = json!(200.0);
        let id = stage.spawn_with("Geyzer", DVec2::ZERO, &late).unwrap().unwrap();
        run(&mut stage, 30);
        // 12 frames of first delay, then 6 of rest and 6 erupting per cycle
        assert_eq!(frames_of(&stage, id, EventKind::Sound), vec![18, 30]);
    }

    #[test]
    fn inert_without_configuration() {
        let mut stage = stage(&[GEYZER]);
        let id = stage.spawn("Geyzer", DVec2::ZERO).unwrap();
        run(&mut stage, 60);
        assert!(stage.events_for(id).is_empty());
        assert_eq!(y(&stage, id), 0.0);
    }
}
