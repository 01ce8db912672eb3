//! Chain of five explosions around the entity, then self-destruction.

use std::rc::Rc;

use glam::DVec2;
use lionheart_engine::{
    Blueprint, ConfigResult, Entity, Feature, FeatureContext, Recyclable, Routine, Setup, Tick,
    Timeline,
};
use serde::Deserialize;

pub const NAME: &str = "explode5";

/// Offset from the entity and delay in ms of each blast.
const BLASTS: [(f64, f64, f64); 5] = [
    (0.0, 0.0, 0.0),
    (-16.0, 16.0, 150.0),
    (16.0, 16.0, 300.0),
    (16.0, -16.0, 450.0),
    (-16.0, -16.0, 600.0),
];

const LIFETIME_MS: f64 = 750.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Explode5Config {
    /// Template spawned for each blast.
    pub effect: String,
}

impl Default for Explode5Config {
    fn default() -> Self {
        Self {
            effect: "Explode".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Blast {
    At(DVec2),
    End,
}

pub struct Explode5 {
    config: Rc<Explode5Config>,
    tick: Tick,
    timeline: Timeline<Blast>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let config = Rc::new(setup.node_or_default::<Explode5Config>(NAME)?);
    Ok(Blueprint::new(NAME, move || {
        Box::new(Explode5 {
            config: Rc::clone(&config),
            tick: Tick::new(),
            timeline: Timeline::new(),
        })
    }))
}

impl Routine for Explode5 {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.tick.update(extrp);
        for blast in self.timeline.poll(&self.tick, ctx.rate()) {
            match blast {
                Blast::At(offset) => {
                    let pos = ctx.entity.pos + offset;
                    ctx.spawn(self.config.effect.as_str(), pos);
                }
                Blast::End => ctx.destroy(),
            }
        }
    }
}

impl Recyclable for Explode5 {
    fn recycle(&mut self, _entity: &mut Entity) {
        self.timeline.clear();
        for (x, y, delay) in BLASTS {
            self.timeline.schedule(delay, Blast::At(DVec2::new(x, y)));
        }
        self.timeline.schedule(LIFETIME_MS, Blast::End);
        self.tick.restart();
    }
}

impl Feature for Explode5 {
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
