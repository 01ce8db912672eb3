//! Tile map geometry as seen by features.
//!
//! The map stores a grid of tiles, each tagged with the collision group it
//! belongs to (`ground`, `slope`, `block`, ...). Features read it through
//! [`crate::Services`]; removals are requested as commands and applied by the
//! stage between callbacks.

use glam::DVec2;

/// A single tile in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Sheet index of the tile graphic.
    pub number: u32,
    /// Collision group name, if the tile collides at all.
    pub group: Option<String>,
}

impl Tile {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            group: None,
        }
    }

    /// Create a tile belonging to a collision group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Grid of tiles, row-major, with row 0 at the bottom.
#[derive(Debug, Clone)]
pub struct MapTile {
    pub width: u32,
    pub height: u32,
    /// Edge length of a tile in world units.
    pub tile_size: f64,
    /// World position of the bottom-left corner of tile (0, 0).
    pub origin: DVec2,
    cells: Vec<Option<Tile>>,
}

impl MapTile {
    pub fn new(width: u32, height: u32, tile_size: f64) -> Self {
        Self {
            width,
            height,
            tile_size,
            origin: DVec2::ZERO,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn with_origin(mut self, origin: DVec2) -> Self {
        self.origin = origin;
        self
    }

    fn cell(&self, tx: u32, ty: u32) -> Option<usize> {
        (tx < self.width && ty < self.height).then(|| (ty * self.width + tx) as usize)
    }

    pub fn get(&self, tx: u32, ty: u32) -> Option<&Tile> {
        self.cell(tx, ty).and_then(|i| self.cells[i].as_ref())
    }

    /// Place or clear a tile; out-of-map coordinates are ignored.
    pub fn set(&mut self, tx: u32, ty: u32, tile: Option<Tile>) {
        if let Some(i) = self.cell(tx, ty) {
            self.cells[i] = tile;
        }
    }

    /// Take the tile out of the map, leaving the cell empty.
    pub fn remove_tile(&mut self, tx: u32, ty: u32) -> Option<Tile> {
        let i = self.cell(tx, ty)?;
        self.cells[i].take()
    }

    pub fn group_at(&self, tx: u32, ty: u32) -> Option<&str> {
        self.get(tx, ty).and_then(|tile| tile.group.as_deref())
    }

    /// Grid cell containing `world_pos`, if it lies on the map.
    pub fn world_to_tile(&self, world_pos: DVec2) -> Option<(u32, u32)> {
        let cell = ((world_pos - self.origin) / self.tile_size).floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let (tx, ty) = (cell.x as u32, cell.y as u32);
        self.cell(tx, ty).map(|_| (tx, ty))
    }

    /// Bottom-left world position of a cell.
    pub fn tile_to_world(&self, tx: u32, ty: u32) -> DVec2 {
        self.origin + DVec2::new(f64::from(tx), f64::from(ty)) * self.tile_size
    }

    /// Grid coordinates and tile under a world position.
    pub fn tile_at(&self, world_pos: DVec2) -> Option<((u32, u32), &Tile)> {
        let (tx, ty) = self.world_to_tile(world_pos)?;
        self.get(tx, ty).map(|tile| ((tx, ty), tile))
    }
}

impl Default for MapTile {
    fn default() -> Self {
        Self::new(0, 0, 16.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut map = MapTile::new(4, 4, 16.0);
        map.set(1, 2, Some(Tile::new(7).with_group("block")));
        assert_eq!(map.get(1, 2).map(|t| t.number), Some(7));
        assert_eq!(map.group_at(1, 2), Some("block"));
        assert!(map.get(0, 0).is_none());
        assert!(map.get(9, 9).is_none());
    }

    #[test]
    fn world_tile_round_trip() {
        let map = MapTile::new(8, 8, 16.0).with_origin(DVec2::new(-32.0, 0.0));
        assert_eq!(map.world_to_tile(DVec2::new(-31.0, 1.0)), Some((0, 0)));
        assert_eq!(map.world_to_tile(DVec2::new(0.0, 17.0)), Some((2, 1)));
        assert_eq!(map.world_to_tile(DVec2::new(-40.0, 0.0)), None);
        assert_eq!(map.tile_to_world(2, 1), DVec2::new(0.0, 16.0));
    }

    #[test]
    fn remove_tile_empties_cell() {
        let mut map = MapTile::new(2, 2, 16.0);
        map.set(1, 1, Some(Tile::new(1).with_group("ground")));
        let removed = map.remove_tile(1, 1);
        assert_eq!(removed.and_then(|t| t.group), Some("ground".to_string()));
        assert!(map.get(1, 1).is_none());
        assert!(map.remove_tile(1, 1).is_none());
        assert!(map.remove_tile(5, 5).is_none());
    }

    #[test]
    fn tile_at_world_position() {
        let mut map = MapTile::new(4, 4, 16.0);
        map.set(2, 0, Some(Tile::new(3).with_group("block")));
        let ((tx, ty), tile) = map.tile_at(DVec2::new(40.0, 4.0)).unwrap();
        assert_eq!((tx, ty), (2, 0));
        assert_eq!(tile.number, 3);
        assert!(map.tile_at(DVec2::new(4.0, 4.0)).is_none());
    }
}
