//! Room-and-corridor floor generation.
//!
//! Rooms are proposed at random and accepted when they keep a one-tile gap to every
//! earlier room. Each accepted room is joined to the previous one by an L-shaped
//! corridor, so the floor is connected by construction. Room 0 is the spawn room.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::constants::*;
use crate::grid::{Grid, Rect};
use crate::tile::TileType;

/// Carved floor plus the accepted rooms in acceptance order
pub struct DungeonLayout {
    pub grid: Grid,
    pub rooms: Vec<Rect>,
}

impl DungeonLayout {
    /// First accepted room; the player spawns at its center.
    pub fn spawn_room(&self) -> &Rect {
        &self.rooms[0]
    }

    /// Last accepted room; holds the stairs or the boss.
    pub fn last_room(&self) -> &Rect {
        &self.rooms[self.rooms.len() - 1]
    }
}

pub struct DungeonGenerator {
    width: usize,
    height: usize,
    grid: Grid,
    rooms: Vec<Rect>,
}

impl DungeonGenerator {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            grid: Grid::new(width, height),
            rooms: Vec::new(),
        }
    }

    /// Generate a standard-size floor with at least two rooms.
    ///
    /// Only the standard size is offered: smaller grids may never fit two rooms.
    pub fn generate(rng: &mut impl Rng) -> DungeonLayout {
        let mut attempt = 1;
        loop {
            let mut gen = Self::new(MAP_WIDTH, MAP_HEIGHT);
            gen.place_rooms(rng);
            if gen.rooms.len() >= 2 {
                debug!("floor layout: {} rooms after {} attempt(s)", gen.rooms.len(), attempt);
                return DungeonLayout {
                    grid: gen.grid,
                    rooms: gen.rooms,
                };
            }
            attempt += 1;
        }
    }

    fn place_rooms(&mut self, rng: &mut impl Rng) {
        for _ in 0..DUNGEON_ROOM_ATTEMPTS {
            let w = rng.gen_range(DUNGEON_MIN_ROOM_SIZE..=DUNGEON_MAX_ROOM_SIZE);
            let h = rng.gen_range(DUNGEON_MIN_ROOM_SIZE..=DUNGEON_MAX_ROOM_SIZE);
            let max_x = self.width as i32 - w - 1;
            let max_y = self.height as i32 - h - 1;
            if max_x < 1 || max_y < 1 {
                continue;
            }
            let room = Rect::new(rng.gen_range(1..=max_x), rng.gen_range(1..=max_y), w, h);

            if self
                .rooms
                .iter()
                .any(|other| room.intersects_with_margin(other, DUNGEON_ROOM_MARGIN))
            {
                continue;
            }

            self.grid.carve_rect(&room);
            if let Some(previous) = self.rooms.last().copied() {
                self.connect_rooms(&previous, &room, rng);
            }
            self.rooms.push(room);
        }
    }

    /// Connect two rooms with an L-shaped corridor.
    fn connect_rooms(&mut self, room1: &Rect, room2: &Rect, rng: &mut impl Rng) {
        let (x1, y1) = room1.center();
        let (x2, y2) = room2.center();

        // Randomly choose to go horizontal-then-vertical or vertical-then-horizontal
        if rng.gen_bool(0.5) {
            self.create_h_corridor(x1, x2, y1);
            self.create_v_corridor(y1, y2, x2);
        } else {
            self.create_v_corridor(y1, y2, x1);
            self.create_h_corridor(x1, x2, y2);
        }
    }

    fn create_h_corridor(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.grid.set(x, y, TileType::Floor);
        }
    }

    fn create_v_corridor(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.grid.set(x, y, TileType::Floor);
        }
    }
}

/// The scripted training corridor.
pub fn tutorial_grid() -> Grid {
    let mut grid = Grid::standard();
    let (x0, x1) = TUTORIAL_FLOOR_X;
    let (y0, y1) = TUTORIAL_FLOOR_Y;
    grid.carve_rect(&Rect::new(x0, y0, x1 - x0, y1 - y0));
    grid
}

/// Number of floor tiles reachable from `start` through orthogonal floor steps.
pub fn count_reachable(grid: &Grid, start: (i32, i32)) -> usize {
    if !grid.is_walkable(start.0, start.1) {
        return 0;
    }
    let mut seen = vec![false; grid.width * grid.height];
    let mut queue = VecDeque::from([start]);
    seen[start.1 as usize * grid.width + start.0 as usize] = true;
    let mut count = 0;

    while let Some((x, y)) = queue.pop_front() {
        count += 1;
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nx, ny) = (x + dx, y + dy);
            if !grid.is_walkable(nx, ny) {
                continue;
            }
            let idx = ny as usize * grid.width + nx as usize;
            if !seen[idx] {
                seen[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    count
}
