use lionheart_engine::SoundEvent;
use serde::{Deserialize, Serialize};

/// Sound effects the catalog can request. Names match the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Sfx {
    MonsterCanon1 = 1,
    MonsterCanon2,
    MonsterGobelin,
    MonsterHurt,
    SceneryGeyzer,
    EffectExplode1,
    EffectExplode2,
    EffectExplode3,
    ProjectileBounce,
}

impl Sfx {
    pub const EXPLODES: [Sfx; 3] = [Sfx::EffectExplode1, Sfx::EffectExplode2, Sfx::EffectExplode3];
}

impl From<Sfx> for SoundEvent {
    fn from(sfx: Sfx) -> Self {
        SoundEvent(sfx as u32)
    }
}
