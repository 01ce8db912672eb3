//! One-shot visual effect that removes itself when its animation ends.
//!
//! Templates carrying an `sfx` node also crackle: every fourth frame plays
//! one of the explosion sounds, picked from the entity's seeded generator.

use std::rc::Rc;

use lionheart_engine::{
    AnimState, AnimationListener, Animation, Blueprint, ConfigResult, Entity, Feature,
    FeatureContext, Recyclable, Setup,
};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::sfx::Sfx;

pub const NAME: &str = "effect";

/// Frames between two explosion sounds.
const SOUND_EVERY: u32 = 4;

#[derive(Debug)]
struct Shared {
    anim: Animation,
    sounds: bool,
}

pub struct Effect {
    shared: Rc<Shared>,
    rng: SmallRng,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let shared = Rc::new(Shared {
        anim: setup.animation("idle")?,
        sounds: setup.has_node("sfx"),
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(Effect {
            shared: Rc::clone(&shared),
            rng: SmallRng::seed_from_u64(0),
        })
    }))
}

impl Recyclable for Effect {
    fn recycle(&mut self, entity: &mut Entity) {
        self.rng = SmallRng::seed_from_u64(entity.seed);
        entity.state = "idle".to_string();
        entity.play(&self.shared.anim);
    }
}

impl AnimationListener for Effect {
    fn notify_anim_frame(&mut self, frame: u32, ctx: &mut FeatureContext) {
        if !self.shared.sounds || frame == 0 || (frame - 1) % SOUND_EVERY != 0 {
            return;
        }
        if let Some(sfx) = Sfx::EXPLODES.choose(&mut self.rng) {
            ctx.play(*sfx);
        }
    }

    fn notify_anim_state(&mut self, state: AnimState, ctx: &mut FeatureContext) {
        if state == AnimState::Finished {
            ctx.destroy();
        }
    }
}

impl Feature for Effect {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recyclable(&mut self) -> Option<&mut dyn Recyclable> {
        Some(self)
    }

    fn animation_listener(&mut self) -> Option<&mut dyn AnimationListener> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use lionheart_engine::{EventKind, SoundEvent};

    use crate::sfx::Sfx;
    use crate::testing::{frames_of, run, stage};

    const EXPLODE: &str = r#"{
        "name": "Explode",
        "animations": { "idle": { "first": 1, "last": 8, "speed": 1.0 } },
        "features": ["effect"],
        "sfx": {}
    }"#;
    const SMOKE: &str = r#"{
        "name": "Smoke",
        "animations": { "idle": { "first": 1, "last": 3, "speed": 0.5 } },
        "features": ["effect"]
    }"#;

    #[test]
    fn destroyed_when_animation_finishes() {
        let mut stage = stage(&[SMOKE]);
        let id = stage.spawn("Smoke", DVec2::ZERO).unwrap();
        run(&mut stage, 10);
        // 3 frames at half speed end on frame 6
        assert_eq!(frames_of(&stage, id, EventKind::Destroy), vec![6]);
        assert!(frames_of(&stage, id, EventKind::Sound).is_empty());
        assert!(stage.entity(id).is_none());
    }

    #[test]
    fn crackles_every_fourth_frame() {
        let mut stage = stage(&[EXPLODE]);
        let id = stage.spawn("Explode", DVec2::ZERO).unwrap();
        run(&mut stage, 10);

        // sheet frame 5 is shown on the fourth update
        assert_eq!(frames_of(&stage, id, EventKind::Sound), vec![4]);
        assert_eq!(frames_of(&stage, id, EventKind::Destroy), vec![8]);
        let sound = stage
            .events_for(id)
            .into_iter()
            .find(|event| event.is(EventKind::Sound))
            .unwrap();
        assert!(Sfx::EXPLODES
            .iter()
            .any(|sfx| SoundEvent::from(*sfx) == SoundEvent(sound.arg)));
    }

    #[test]
    fn frame_zero_is_silent() {
        use lionheart_engine::{Commands, EntityId, FeatureContext, Services, Setup};

        let setup = Setup::from_json(EXPLODE).unwrap();
        let mut feature = super::load(&setup).unwrap().build();
        let mut entity = setup.prototype().instantiate(EntityId(1), DVec2::ZERO, 7);
        let services = Services::new();
        let mut commands = Commands::new();
        feature.recyclable().unwrap().recycle(&mut entity);

        let listener = feature.animation_listener().unwrap();
        for frame in [0, 2, 3, 4] {
            let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
            listener.notify_anim_frame(frame, &mut ctx);
        }
        assert!(commands.is_empty());

        let mut ctx = FeatureContext::new(&mut entity, &services, &mut commands);
        listener.notify_anim_frame(5, &mut ctx);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn same_place_same_sound() {
        let pick = |x: f64| {
            let mut stage = stage(&[EXPLODE]);
            let id = stage.spawn("Explode", DVec2::new(x, 0.0)).unwrap();
            run(&mut stage, 4);
            stage.events_for(id)[0].arg
        };
        assert_eq!(pick(32.0), pick(32.0));
    }
}
