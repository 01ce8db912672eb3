use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sound event emitted by a feature.
/// The numeric value maps to a game-defined sound on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// Kind tag stored in [`FeatureEvent::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EventKind {
    Spawn = 1,
    Destroy = 2,
    Sound = 3,
    RemoveTile = 4,
    StateChange = 5,
    Launch = 6,
}

/// Flat record of one observable side effect.
/// Generic container: `kind` identifies the effect, `arg/x/y` carry payload.
///
/// The stage keeps these in order so two runs can be compared byte for byte.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FeatureEvent {
    /// Stage frame the effect was applied on.
    pub frame: u32,
    /// Entity that requested the effect.
    pub entity: u32,
    pub kind: u32,
    /// Sound id, template or state key, tile column.
    pub arg: u32,
    pub x: f32,
    pub y: f32,
}

impl FeatureEvent {
    pub const FLOATS: usize = 6;

    pub fn new(frame: u32, entity: EntityId, kind: EventKind, arg: u32, x: f64, y: f64) -> Self {
        Self {
            frame,
            entity: entity.0,
            kind: kind as u32,
            arg,
            x: x as f32,
            y: y as f32,
        }
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.kind == kind as u32
    }

    /// Same effect with frame and entity made relative, for comparing runs.
    pub fn relative_to(&self, start_frame: u32) -> Self {
        Self {
            frame: self.frame.wrapping_sub(start_frame),
            entity: 0,
            ..*self
        }
    }
}

/// Stable 32-bit key of a name (FNV-1a), used where events refer to
/// templates or states.
pub fn name_key(name: &str) -> u32 {
    name.bytes().fold(0x811c_9dc5, |hash: u32, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keys_are_stable() {
        assert_eq!(name_key(""), 0x811c_9dc5);
        assert_eq!(name_key("a"), 0xe40c_292c);
        assert_ne!(name_key("Explode"), name_key("ExplodeBlock"));
    }

    #[test]
    fn event_is_plain_bytes() {
        let events = [FeatureEvent::new(3, EntityId(9), EventKind::Sound, 4, 1.0, 2.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&events);
        assert_eq!(bytes.len(), FeatureEvent::FLOATS * 4);
    }

    #[test]
    fn relative_drops_identity() {
        let event = FeatureEvent::new(10, EntityId(4), EventKind::Destroy, 0, 0.0, 0.0);
        let rel = event.relative_to(7);
        assert_eq!(rel.frame, 3);
        assert_eq!(rel.entity, 0);
        assert!(rel.is(EventKind::Destroy));
    }
}
