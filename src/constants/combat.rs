//! Combat system constants.

/// Base critical hit chance in percent, before dexterity and gear
pub const BASE_CRIT_CHANCE: i32 = 5;
/// Critical hit damage multiplier
pub const CRIT_MULTIPLIER: f32 = 1.5;
/// Lowest random adjustment to a weapon hit
pub const WEAPON_ROLL_MIN: i32 = -1;
/// Highest random adjustment to a weapon hit
pub const WEAPON_ROLL_MAX: i32 = 2;

/// Chance an enemy kill drops a ground item
pub const LOOT_DROP_CHANCE: f64 = 0.3;

/// HP restored on kill once the life-on-kill feat is learned
pub const LIFE_ON_KILL: i32 = 5;
/// Mana restored on kill once the mana-on-kill feat is learned
pub const MANA_ON_KILL: i32 = 3;

/// Void essence awarded for killing a Warden
pub const WARDEN_ESSENCE: u32 = 10;
/// Void essence awarded for killing the Overlord
pub const OVERLORD_ESSENCE: u32 = 50;
