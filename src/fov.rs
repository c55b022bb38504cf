//! Visibility: radius-based ambient fog plus a Bresenham line-of-sight primitive.
//!
//! Ambient fog ignores walls entirely; only ranged AI asks for a real sightline.

use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::constants::*;
use crate::grid::Grid;

/// Visible and explored cells of the current floor, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub width: usize,
    pub height: usize,
    pub visible: Vec<bool>,
    /// Running union of every visible set since the floor was entered
    pub explored: Vec<bool>,
}

impl Visibility {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            visible: vec![false; width * height],
            explored: vec![false; width * height],
        }
    }

    pub fn standard() -> Self {
        Self::new(MAP_WIDTH, MAP_HEIGHT)
    }

    /// Forget everything (new floor).
    pub fn reset(&mut self) {
        self.visible.fill(false);
        self.explored.fill(false);
    }

    /// Recompute the visible set from `origin` and merge it into explored.
    pub fn update(&mut self, origin: Position, radius: f32) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let seen = origin.distance(&Position::new(x as i32, y as i32)) < radius;
                self.visible[idx] = seen;
                if seen {
                    self.explored[idx] = true;
                }
            }
        }
    }

    /// Mark the whole map visible and explored.
    pub fn reveal_all(&mut self) {
        self.visible.fill(true);
        self.explored.fill(true);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.visible[i]).unwrap_or(false)
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.explored[i]).unwrap_or(false)
    }
}

/// Ambient visibility radius for a given effective intelligence.
pub fn visibility_radius(effective_int: i32) -> f32 {
    VISIBILITY_RADIUS + effective_int as f32 / VISIBILITY_INT_DIVISOR
}

/// Bresenham walk from `from` to `to`. Blocked by any wall cell except the origin.
pub fn has_line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        if x == to.x && y == to.y {
            return true;
        }
        if (x, y) != (from.x, from.y) && grid.get(x, y).map_or(true, |t| t.blocks_vision()) {
            return false;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Rect;
    use crate::tile::TileType;

    fn open_room() -> Grid {
        let mut grid = Grid::new(20, 20);
        grid.carve_rect(&Rect::new(1, 1, 18, 18));
        grid
    }

    #[test]
    fn test_radius_from_int() {
        assert_eq!(visibility_radius(0), 7.0);
        assert_eq!(visibility_radius(3), 8.0);
        assert!((visibility_radius(7) - 9.3333).abs() < 0.001);
    }

    #[test]
    fn test_visibility_is_strict_radius() {
        let mut vis = Visibility::new(20, 20);
        vis.update(Position::new(10, 10), 3.0);
        assert!(vis.is_visible(10, 10));
        assert!(vis.is_visible(12, 12));
        assert!(!vis.is_visible(13, 10));
        assert!(!vis.is_visible(10, 14));
    }

    #[test]
    fn test_explored_accumulates() {
        let mut vis = Visibility::new(20, 20);
        vis.update(Position::new(2, 2), 2.0);
        vis.update(Position::new(17, 17), 2.0);
        assert!(!vis.is_visible(2, 2));
        assert!(vis.is_explored(2, 2));
        assert!(vis.is_explored(17, 17));
        vis.reset();
        assert!(!vis.is_explored(2, 2));
    }

    #[test]
    fn test_line_of_sight_open() {
        let grid = open_room();
        assert!(has_line_of_sight(&grid, Position::new(2, 2), Position::new(10, 7)));
        assert!(has_line_of_sight(&grid, Position::new(5, 5), Position::new(5, 5)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_wall() {
        let mut grid = open_room();
        grid.set(6, 5, TileType::Wall);
        assert!(!has_line_of_sight(&grid, Position::new(3, 5), Position::new(9, 5)));
    }

    #[test]
    fn test_origin_wall_does_not_block() {
        let mut grid = open_room();
        grid.set(3, 5, TileType::Wall);
        assert!(has_line_of_sight(&grid, Position::new(3, 5), Position::new(9, 5)));
    }
}
