//! Item generation constants.

/// Chance a random drop is a consumable
pub const CONSUMABLE_CHANCE: f64 = 0.7;

/// Base item power at depth 0
pub const ITEM_BASE_POWER: i32 = 2;
/// Item power gained per depth
pub const ITEM_POWER_PER_DEPTH: i32 = 2;

/// Health potion base heal
pub const POTION_BASE_HEAL: f64 = 15.0;
/// Health potion heal gained per depth (before rarity)
pub const POTION_HEAL_PER_DEPTH: f64 = 5.0;

/// Rarity roll thresholds (roll strictly above)
pub const LEGENDARY_ROLL: f64 = 0.98;
pub const EPIC_ROLL: f64 = 0.9;
pub const RARE_ROLL: f64 = 0.75;
pub const UNCOMMON_ROLL: f64 = 0.5;
