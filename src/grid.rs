use serde::{Deserialize, Serialize};

use crate::constants::{MAP_HEIGHT, MAP_WIDTH};
use crate::tile::TileType;

/// A rectangle representing a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Overlap test that also rejects rooms closer than `margin` tiles apart.
    pub fn intersects_with_margin(&self, other: &Rect, margin: i32) -> bool {
        self.x < other.x + other.width + margin
            && self.x + self.width + margin > other.x
            && self.y < other.y + other.height + margin
            && self.y + self.height + margin > other.y
    }
}

/// Static tile map of one floor, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileType>,
}

impl Grid {
    /// An all-wall grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Wall; width * height],
        }
    }

    /// An all-wall grid of the standard floor size.
    pub fn standard() -> Self {
        Self::new(MAP_WIDTH, MAP_HEIGHT)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|t| t.is_walkable()).unwrap_or(false)
    }

    pub fn carve_rect(&mut self, rect: &Rect) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.set(x, y, TileType::Floor);
            }
        }
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_walkable()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(0, 0, 10, 10);
        assert_eq!(rect.center(), (5, 5));

        let rect2 = Rect::new(5, 5, 4, 6);
        assert_eq!(rect2.center(), (7, 8));
    }

    #[test]
    fn test_margin_rejects_touching_rooms() {
        let a = Rect::new(1, 1, 4, 4);
        let touching = Rect::new(5, 1, 4, 4);
        let spaced = Rect::new(7, 1, 4, 4);
        assert!(a.intersects_with_margin(&touching, 1));
        assert!(!a.intersects_with_margin(&spaced, 1));
    }

    #[test]
    fn test_out_of_bounds_is_not_walkable() {
        let mut grid = Grid::new(5, 5);
        grid.set(2, 2, TileType::Floor);
        assert!(grid.is_walkable(2, 2));
        assert!(!grid.is_walkable(-1, 2));
        assert!(!grid.is_walkable(5, 0));
        assert_eq!(grid.get(10, 10), None);
    }

    #[test]
    fn test_carve_rect() {
        let mut grid = Grid::new(10, 10);
        grid.carve_rect(&Rect::new(2, 3, 4, 2));
        assert_eq!(grid.floor_count(), 8);
        assert_eq!(grid.get(2, 3), Some(TileType::Floor));
        assert_eq!(grid.get(6, 3), Some(TileType::Wall));
    }
}
