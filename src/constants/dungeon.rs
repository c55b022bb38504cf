//! Dungeon generation constants.

/// Map width in tiles
pub const MAP_WIDTH: usize = 40;
/// Map height in tiles
pub const MAP_HEIGHT: usize = 25;

/// Number of room placements attempted per floor
pub const DUNGEON_ROOM_ATTEMPTS: usize = 20;
/// Minimum room side length
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 4;
/// Maximum room side length
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 8;
/// Gap kept between accepted rooms
pub const DUNGEON_ROOM_MARGIN: i32 = 1;

/// Last floor of a normal run (boss floor, no stairs)
pub const NORMAL_FINAL_DEPTH: u32 = 10;
/// Last floor of a gauntlet run
pub const GAUNTLET_FINAL_DEPTH: u32 = 50;
/// Boss floors repeat on this cadence
pub const BOSS_FLOOR_INTERVAL: u32 = 5;
/// Gauntlet multiplies depth by this for enemy scaling
pub const GAUNTLET_DEPTH_SCALE: f32 = 1.5;

/// Chance a non-spawn room gets an enemy (normal mode)
pub const ENEMY_ROOM_CHANCE: f64 = 0.4;
/// Chance a non-spawn room gets an enemy (gauntlet mode)
pub const GAUNTLET_ENEMY_ROOM_CHANCE: f64 = 0.6;
/// Chance a non-spawn room gets a ground item
pub const ITEM_ROOM_CHANCE: f64 = 0.3;

// TUTORIAL FLOOR
/// Carved corridor, x range (end exclusive)
pub const TUTORIAL_FLOOR_X: (i32, i32) = (2, 38);
/// Carved corridor, y range (end exclusive)
pub const TUTORIAL_FLOOR_Y: (i32, i32) = (10, 14);
pub const TUTORIAL_PLAYER_START: (i32, i32) = (4, 12);
pub const TUTORIAL_WEAPON_POS: (i32, i32) = (12, 12);
pub const TUTORIAL_WEAPON_DAMAGE: i32 = 5;
pub const TUTORIAL_DUMMY_POS: (i32, i32) = (20, 12);
pub const TUTORIAL_DUMMY_HEALTH: i32 = 30;
pub const TUTORIAL_WISP_POS: (i32, i32) = (30, 12);
pub const TUTORIAL_WISP_HEALTH: i32 = 15;
pub const TUTORIAL_EXIT_POS: (i32, i32) = (36, 12);
