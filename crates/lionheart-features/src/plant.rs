//! Carnivorous plant: bites now and then, and catches whoever lands in it.

use std::rc::Rc;

use lionheart_engine::{
    names, AnimState, Animation, Blueprint, CollidableListener, Collision, ConfigResult, Entity,
    Feature, FeatureContext, Recyclable, Routine, Setup, Tick,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const NAME: &str = "carnivorous_plant";

const BITE_DELAY_MS: f64 = 1500.0;
const BITE_CHANCE: f64 = 0.5;
/// State given to a victim caught by the plant.
pub const BITTEN: &str = "bitten";

pub struct CarnivorousPlant {
    bite: Rc<Animation>,
    tick: Tick,
    rng: SmallRng,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let bite = Rc::new(setup.animation("attack")?);
    Ok(Blueprint::new(NAME, move || {
        Box::new(CarnivorousPlant {
            bite: Rc::clone(&bite),
            tick: Tick::new(),
            rng: SmallRng::seed_from_u64(0),
        })
    }))
}

impl Routine for CarnivorousPlant {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.tick.update(extrp);
        if ctx.entity.anim_state() == AnimState::Finished
            && self.tick.elapsed_time(ctx.rate(), BITE_DELAY_MS)
        {
            if self.rng.gen_bool(BITE_CHANCE) {
                ctx.entity.play(&self.bite);
            }
            self.tick.restart();
        }
    }
}

impl CollidableListener for CarnivorousPlant {
    fn notify_collided(
        &mut self,
        other: &mut Entity,
        with: &Collision,
        by: &Collision,
        ctx: &mut FeatureContext,
    ) {
        if with.name == names::BITE && by.name.contains(names::BODY) && other.is_descending() {
            ctx.change_state(other, BITTEN);
        }
    }
}

impl Recyclable for CarnivorousPlant {
    fn recycle(&mut self, entity: &mut Entity) {
        self.rng = SmallRng::seed_from_u64(entity.seed);
        self.tick.restart();
        entity.play(&self.bite);
    }
}

impl Feature for CarnivorousPlant {
    fn name(&self) -> &'static str {
        NAME
    }

    fn routine(&mut self) -> Option<&mut dyn Routine> {
        Some(self)
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }

    fn collidable_listener(&mut self) -> Option<&mut dyn CollidableListener> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use lionheart_engine::{name_key, EventKind, Stage};

    use crate::testing::{frames_of, run, stage};

    const PLANT: &str = r#"{
        "name": "Plant",
        "animations": { "attack": { "first": 1, "last": 4, "speed": 0.5 } },
        "collisions": ["bite"],
        "features": ["carnivorous_plant"]
    }"#;
    const PLAYER: &str = r#"{ "name": "Player", "collisions": ["body_top"] }"#;

    fn drop_onto(stage: &mut Stage, player: lionheart_engine::EntityId, dy: f64) {
        let entity = stage.entity_mut(player).unwrap();
        entity.old_pos = entity.pos;
        entity.pos.y += dy;
    }

    #[test]
    fn bites_descending_body() {
        let mut stage = stage(&[PLANT, PLAYER]);
        let plant = stage.spawn("Plant", DVec2::ZERO).unwrap();
        let player = stage.spawn("Player", DVec2::new(0.0, 10.0)).unwrap();

        drop_onto(&mut stage, player, 2.0);
        stage.notify_collided(plant, player, "bite", "body_top");
        assert_eq!(stage.entity(player).unwrap().state, "");

        drop_onto(&mut stage, player, -2.0);
        stage.notify_collided(plant, player, "body", "body_top");
        assert_eq!(stage.entity(player).unwrap().state, "");

        stage.notify_collided(plant, player, "bite", "body_top");
        assert_eq!(stage.entity(player).unwrap().state, BITTEN);
        let events = stage.events_for(plant);
        assert_eq!(events.len(), 1);
        assert!(events[0].is(EventKind::StateChange));
        assert_eq!(events[0].arg, name_key(BITTEN));
        assert_eq!(frames_of(&stage, plant, EventKind::StateChange), vec![0]);
    }

    #[test]
    fn rebites_at_random_with_seeded_choices() {
        let trace = || {
            let mut stage = stage(&[PLANT]);
            let plant = stage.spawn("Plant", DVec2::new(48.0, 16.0)).unwrap();
            (0..3000)
                .map(|_| {
                    run(&mut stage, 1);
                    stage.entity(plant).unwrap().anim_state()
                })
                .collect::<Vec<_>>()
        };
        let first = trace();
        assert_eq!(first, trace());
        // the opening bite ends on frame 8; later bites come from rolls
        assert!(first[100..].contains(&AnimState::Playing));
    }
}
