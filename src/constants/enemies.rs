//! Enemy stats, spawning and AI range constants.

/// Distance at which enemies start chasing the player
pub const AGGRO_RANGE: f32 = 8.0;
/// Distance at which enemies can hit the player in melee
pub const MELEE_RANGE: f32 = 1.5;
/// Ranged enemies shoot when closer than this (and outside melee)
pub const RANGED_ATTACK_RANGE: f32 = 6.0;
/// Chance a ranged enemy with a clear shot takes it
pub const RANGED_SHOT_CHANCE: f64 = 0.5;
/// Healers hold position while a hurt ally is closer than this
pub const HEALER_SUPPORT_RANGE: f32 = 4.0;

/// Roll above which a spawned enemy is a healer
pub const HEALER_ROLL: f64 = 0.9;
/// Roll above which a spawned enemy is ranged
pub const RANGED_ROLL: f64 = 0.8;

// GOBLIN (baseline melee)
/// Base health before depth scaling
pub const ENEMY_BASE_HEALTH: f32 = 15.0;
/// Health gained per effective depth
pub const ENEMY_HEALTH_PER_DEPTH: f32 = 3.0;
/// Base XP reward before depth scaling
pub const ENEMY_BASE_XP: u32 = 10;
/// Enemy strength
pub const ENEMY_STRENGTH: i32 = 2;
/// Enemy dexterity
pub const ENEMY_DEXTERITY: i32 = 1;
/// Enemy constitution
pub const ENEMY_CONSTITUTION: i32 = 2;

// VOID ARCHER / VOID PRIEST
/// Health offset for ranged enemies (frailer)
pub const ARCHER_HEALTH_OFFSET: i32 = -5;
/// Health offset for healers (sturdier)
pub const PRIEST_HEALTH_OFFSET: i32 = 5;

// BOSSES
/// Warden base health
pub const WARDEN_BASE_HEALTH: i32 = 80;
/// Warden health gained per depth
pub const WARDEN_HEALTH_PER_DEPTH: i32 = 10;
/// Divisor of the quadratic Warden health term
pub const WARDEN_HEALTH_QUADRATIC_DIVISOR: i32 = 4;
/// Overlord health
pub const OVERLORD_HEALTH: i32 = 400;
/// Strength added to bosses
pub const BOSS_STRENGTH_BONUS: i32 = 5;
/// XP reward for any boss
pub const BOSS_XP: u32 = 200;
/// Gauntlet boss health multiplier
pub const GAUNTLET_BOSS_HEALTH_SCALE: f32 = 1.5;
