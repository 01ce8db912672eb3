//! Breakable block: an attack breaks the BLOCK tile it stands on.

use lionheart_engine::{
    names, Blueprint, CollidableListener, Collision, ConfigResult, Entity, Feature,
    FeatureContext, Recyclable, Setup,
};

use crate::sfx::Sfx;

pub const NAME: &str = "block";

/// Effect spawned where the tile was.
const EXPLOSION: &str = "ExplodeBlock";

#[derive(Debug, Default)]
pub struct Block {
    broken: bool,
}

pub fn load(_setup: &Setup) -> ConfigResult<Blueprint> {
    Ok(Blueprint::new(NAME, || Box::new(Block::default())))
}

impl CollidableListener for Block {
    fn notify_collided(
        &mut self,
        _other: &mut Entity,
        _with: &Collision,
        by: &Collision,
        ctx: &mut FeatureContext,
    ) {
        if self.broken || !by.name.starts_with(names::ATTACK) {
            return;
        }
        let map = &ctx.services.map;
        let hit = map
            .tile_at(ctx.entity.pos)
            .filter(|(_, tile)| tile.group.as_deref() == Some(names::BLOCK))
            .map(|((tx, ty), _)| (tx, ty, map.tile_to_world(tx, ty)));
        if let Some((tx, ty, at)) = hit {
            ctx.remove_tile(tx, ty);
            ctx.spawn(EXPLOSION, at);
            ctx.play(Sfx::MonsterHurt);
        }
        ctx.destroy();
        self.broken = true;
    }
}

impl Recyclable for Block {
    fn recycle(&mut self, _entity: &mut Entity) {
        self.broken = false;
    }
}

impl Feature for Block {
    fn name(&self) -> &'static str {
        NAME
    }

    fn prepare(&mut self, entity: &Entity) {
        if entity.collidable.is_none() {
            log::warn!("`{}` uses {} without collisions", entity.tag, NAME);
        }
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
    use glam::DVec2;
    use lionheart_engine::{name_key, EventKind, MapTile, Services, SoundEvent, Tile};

    use crate::sfx::Sfx;
    use crate::testing::stage_with;

    const BLOCK: &str = r#"{ "name": "Block", "collisions": ["body"], "features": ["block"] }"#;
    const PLAYER: &str = r#"{ "name": "Player", "collisions": ["attack_sword", "body"] }"#;
    const EXPLODE: &str = r#"{ "name": "ExplodeBlock" }"#;

    fn services() -> Services {
        let mut map = MapTile::new(4, 4, 16.0);
        map.set(1, 1, Some(Tile::new(3).with_group("block")));
        map.set(2, 1, Some(Tile::new(4).with_group("ground")));
        Services::new().with_map(map)
    }

    #[test]
    fn attack_breaks_block_tile() {
        let mut stage = stage_with(&[BLOCK, PLAYER, EXPLODE], services());
        let block = stage.spawn("Block", DVec2::new(20.0, 20.0)).unwrap();
        let player = stage.spawn("Player", DVec2::new(8.0, 20.0)).unwrap();

        stage.notify_collided(block, player, "body", "body");
        assert!(stage.entity(block).is_some());

        stage.notify_collided(block, player, "body", "attack_sword");
        let kinds: Vec<u32> = stage.events_for(block).iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::RemoveTile as u32,
                EventKind::Spawn as u32,
                EventKind::Sound as u32,
                EventKind::Destroy as u32,
            ]
        );
        let events = stage.events_for(block);
        assert_eq!(events[1].arg, name_key("ExplodeBlock"));
        assert_eq!((events[1].x, events[1].y), (16.0, 16.0));
        assert_eq!(SoundEvent(events[2].arg), SoundEvent::from(Sfx::MonsterHurt));
        assert!(stage.services().map.get(1, 1).is_none());
        assert!(stage.entity(block).is_none());

        // further hits on the removed entity are ignored
        stage.notify_collided(block, player, "body", "attack_sword");
        assert_eq!(stage.events_for(block).len(), 4);
    }

    #[test]
    fn other_tiles_survive() {
        let mut stage = stage_with(&[BLOCK, PLAYER, EXPLODE], services());
        let block = stage.spawn("Block", DVec2::new(40.0, 20.0)).unwrap();
        let player = stage.spawn("Player", DVec2::ZERO).unwrap();

        stage.notify_collided(block, player, "body", "attack_sword");
        let events = stage.events_for(block);
        assert_eq!(events.len(), 1);
        assert!(events[0].is(EventKind::Destroy));
        assert!(stage.services().map.get(2, 1).is_some());
    }
}
