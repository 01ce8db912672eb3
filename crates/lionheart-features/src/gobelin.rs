//! Gobelin thrower: attack, throw, idle, fall back, attack again.

use std::rc::Rc;

use lionheart_engine::{
    Animation, Blueprint, ConfigResult, Entity, Feature, FeatureContext, Guard, Launcher,
    PhaseMachine, Recyclable, Routine, Setup, Transition,
};

use crate::sfx::Sfx;

pub const NAME: &str = "gobelin";

const MOVE_UP_DELAY_MS: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Attack,
    Idle,
    Fall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Act {
    Throw,
    Fall,
    Attack,
}

const TABLE: [Transition<Phase, Act>; 3] = [
    Transition::new(Phase::Attack, Guard::AnimFinished, Phase::Idle, Act::Throw),
    Transition::new(Phase::Idle, Guard::Millis(MOVE_UP_DELAY_MS), Phase::Fall, Act::Fall),
    Transition::new(Phase::Fall, Guard::Millis(MOVE_UP_DELAY_MS), Phase::Attack, Act::Attack),
];

#[derive(Debug)]
struct Anims {
    idle: Animation,
    attack: Animation,
    fall: Animation,
}

pub struct Gobelin {
    anims: Rc<Anims>,
    machine: PhaseMachine<Phase>,
}

pub fn load(setup: &Setup) -> ConfigResult<Blueprint> {
    let anims = Rc::new(Anims {
        idle: setup.animation("idle")?,
        attack: setup.animation("attack")?,
        fall: setup.animation("fall")?,
    });
    Ok(Blueprint::new(NAME, move || {
        Box::new(Gobelin {
            anims: Rc::clone(&anims),
            machine: PhaseMachine::new(Phase::Attack),
        })
    }))
}

impl Routine for Gobelin {
    fn update(&mut self, extrp: f64, ctx: &mut FeatureContext) {
        self.machine.begin_frame(extrp);
        let Some(act) = self.machine.step(&TABLE, ctx.entity.anim_state(), ctx.rate()) else {
            return;
        };
        match act {
            Act::Throw => {
                ctx.entity.play(&self.anims.idle);
                if let Some(direction) = ctx.entity.launcher.as_ref().map(Launcher::direction) {
                    ctx.fire(direction);
                }
            }
            Act::Fall => ctx.entity.play(&self.anims.fall),
            Act::Attack => {
                ctx.entity.play(&self.anims.attack);
                ctx.play(Sfx::MonsterGobelin);
            }
        }
    }
}

impl Recyclable for Gobelin {
    fn recycle(&mut self, entity: &mut Entity) {
        entity.play(&self.anims.attack);
        self.machine.reset();
    }
}

impl Feature for Gobelin {
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

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use lionheart_engine::EventKind;

    use crate::testing::{frames_of, run, stage};

    const GOBELIN: &str = r#"{
        "name": "Gobelin",
        "animations": {
            "idle": { "first": 1, "last": 1 },
            "attack": { "first": 1, "last": 2, "speed": 0.5 },
            "fall": { "first": 3, "last": 4 }
        },
        "launcher": { "projectile": "Axe", "vx": -1.0 },
        "features": ["gobelin"]
    }"#;
    const AXE: &str = r#"{ "name": "Axe" }"#;

    #[test]
    fn throws_after_attack_animation() {
        let mut stage = stage(&[GOBELIN, AXE]);
        let id = stage.spawn("Gobelin", DVec2::ZERO).unwrap();
        run(&mut stage, 110);

        // attack ends on frame 4, seen on frame 5; 48 frames per 800 ms
        assert_eq!(frames_of(&stage, id, EventKind::Launch), vec![5, 105]);
        assert_eq!(frames_of(&stage, id, EventKind::Sound), vec![101]);
    }

    #[test]
    fn missing_animation_fails_load() {
        let broken = GOBELIN.replace(r#""fall""#, r#""drop""#);
        let mut registry = lionheart_engine::TemplateRegistry::new(crate::registry());
        assert!(matches!(
            registry.load(&broken),
            Err(lionheart_engine::ConfigError::MissingAnimation { .. })
        ));
    }
}
