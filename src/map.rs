//! Static tile map and geometry queries
//!
//! The world is a fixed grid of cells; everything outside the grid
//! classifies as wall, so the world is closed. Queries take continuous
//! world coordinates (one cell = one world unit).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::STEP;

/// Classification of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    /// Standing on this cell completes the level
    Exit,
}

impl Tile {
    fn from_code(code: u8) -> Self {
        match code {
            0 => Tile::Floor,
            2 => Tile::Exit,
            // 1 and anything unrecognized
            _ => Tile::Wall,
        }
    }
}

/// Immutable tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<Tile>,
}

impl TileMap {
    /// Build a map from a flat row-major array of tile codes
    /// (0 = floor, 1 = wall, 2 = exit). Unknown codes and missing cells
    /// become walls rather than errors.
    pub fn from_flat(width: u32, height: u32, codes: &[u8]) -> Self {
        let len = (width * height) as usize;
        let mut cells = Vec::with_capacity(len);
        for i in 0..len {
            cells.push(codes.get(i).copied().map_or(Tile::Wall, Tile::from_code));
        }
        Self {
            width: width as i32,
            height: height as i32,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Classify the cell containing the world point (x, y).
    /// Out-of-bounds points are walls.
    pub fn tile_at(&self, x: f32, y: f32) -> Tile {
        let gx = x.floor() as i32;
        let gy = y.floor() as i32;
        if gx < 0 || gy < 0 || gx >= self.width || gy >= self.height {
            return Tile::Wall;
        }
        self.cells[(gy * self.width + gx) as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: f32, y: f32) -> bool {
        self.tile_at(x, y) == Tile::Wall
    }

    /// Approximate circle-vs-wall test: samples points around the circle
    /// and reports a collision if any sample lands in a wall. Can miss
    /// contact through the gaps between samples for radii large relative
    /// to a cell; the game's radii are all well under half a cell.
    pub fn collides(&self, pos: Vec2, radius: f32) -> bool {
        const SAMPLES: u32 = 10;
        for i in 0..SAMPLES {
            let a = i as f32 / SAMPLES as f32 * std::f32::consts::TAU;
            if self.is_wall(pos.x + a.cos() * radius, pos.y + a.sin() * radius) {
                return true;
            }
        }
        false
    }

    /// March the segment from `a` to `b` in fixed steps; false as soon as
    /// any sample is inside a wall.
    pub fn line_of_sight(&self, a: Vec2, b: Vec2) -> bool {
        let delta = b - a;
        let dist = delta.length();
        let steps = (dist / STEP).ceil() as i32;
        for i in 1..steps {
            let t = i as f32 / steps as f32;
            let p = a + delta * t;
            if self.is_wall(p.x, p.y) {
                return false;
            }
        }
        true
    }
}

/// The built-in 16x16 level. Exit in the south-east corner.
#[rustfmt::skip]
const LEVEL_ONE: [u8; 256] = [
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,
    1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,
    1,0,0,0,0,1,1,0,0,0,0,0,0,0,0,1,
    1,0,0,0,0,1,0,0,0,1,1,1,0,1,0,1,
    1,0,0,1,0,1,0,0,0,0,0,1,0,1,0,1,
    1,0,0,1,0,1,0,0,0,0,0,1,0,1,0,1,
    1,0,0,1,0,1,0,0,0,1,0,1,0,0,0,1,
    1,0,0,1,0,1,0,0,0,1,0,0,0,0,0,1,
    1,0,0,0,0,0,0,0,0,1,0,0,0,0,0,1,
    1,0,0,0,0,0,0,0,0,1,0,0,0,0,0,1,
    1,0,0,1,0,1,0,0,0,1,0,1,0,1,0,1,
    1,0,0,1,0,1,0,0,0,1,0,1,0,1,0,1,
    1,0,0,1,0,0,0,0,0,1,0,1,0,1,0,1,
    1,0,0,1,0,0,0,0,0,0,0,1,0,0,0,1,
    1,0,0,0,0,0,0,0,0,0,0,0,0,0,2,1,
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,
];

impl Default for TileMap {
    fn default() -> Self {
        Self::from_flat(16, 16, &LEVEL_ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_out_of_bounds_is_wall() {
        let map = TileMap::default();
        assert_eq!(map.tile_at(-1.0, 5.0), Tile::Wall);
        assert_eq!(map.tile_at(5.0, -0.1), Tile::Wall);
        assert_eq!(map.tile_at(16.5, 5.0), Tile::Wall);
        assert_eq!(map.tile_at(5.0, 99.0), Tile::Wall);
    }

    #[test]
    fn test_default_level_cells() {
        let map = TileMap::default();
        assert_eq!(map.tile_at(2.5, 2.5), Tile::Floor);
        assert_eq!(map.tile_at(0.5, 0.5), Tile::Wall);
        assert_eq!(map.tile_at(14.5, 14.5), Tile::Exit);
    }

    #[test]
    fn test_from_flat_defensive() {
        // Short input pads with walls, unknown codes become walls
        let map = TileMap::from_flat(2, 2, &[0, 7, 2]);
        assert_eq!(map.tile_at(0.5, 0.5), Tile::Floor);
        assert_eq!(map.tile_at(1.5, 0.5), Tile::Wall);
        assert_eq!(map.tile_at(0.5, 1.5), Tile::Exit);
        assert_eq!(map.tile_at(1.5, 1.5), Tile::Wall);
    }

    #[test]
    fn test_exit_is_not_blocking() {
        let map = TileMap::default();
        assert!(!map.is_wall(14.5, 14.5));
    }

    #[test]
    fn test_line_of_sight_through_wall() {
        let map = TileMap::default();
        // Straight corridor shot along x=1.5: clear
        assert!(map.line_of_sight(Vec2::new(1.5, 1.5), Vec2::new(1.5, 13.5)));
        // Through the block at (5, 2): blocked
        assert!(!map.line_of_sight(Vec2::new(4.5, 2.5), Vec2::new(7.5, 2.5)));
    }

    #[test]
    fn test_line_of_sight_adjacent_points() {
        let map = TileMap::default();
        assert!(map.line_of_sight(Vec2::new(2.5, 2.5), Vec2::new(2.5, 2.5)));
        assert!(map.line_of_sight(Vec2::new(2.5, 2.5), Vec2::new(2.6, 2.5)));
    }

    proptest! {
        // If collides() is false, no circle sample may classify as wall:
        // the approximation must at least agree with its own sampling.
        #[test]
        fn collides_consistent_with_samples(
            x in 0.0_f32..16.0,
            y in 0.0_f32..16.0,
            radius in 0.01_f32..0.4,
        ) {
            let map = TileMap::default();
            let pos = Vec2::new(x, y);
            if !map.collides(pos, radius) {
                for i in 0..10u32 {
                    let a = i as f32 / 10.0 * std::f32::consts::TAU;
                    prop_assert!(!map.is_wall(
                        pos.x + a.cos() * radius,
                        pos.y + a.sin() * radius,
                    ));
                }
            }
        }
    }
}
