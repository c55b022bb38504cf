//! Core gameplay constants (player, XP, visibility, inventory).

/// Ambient visibility radius before the intelligence bonus
pub const VISIBILITY_RADIUS: f32 = 7.0;
/// Effective intelligence per extra tile of visibility
pub const VISIBILITY_INT_DIVISOR: f32 = 3.0;

/// Inventory slot count
pub const MAX_INVENTORY: usize = 25;

/// XP needed per level (XP needed = level * this)
pub const XP_PER_LEVEL_MULTIPLIER: u32 = 50;
/// Max HP gained on level up
pub const LEVEL_UP_MAX_HP: i32 = 5;

/// Base mana regenerated each turn
pub const BASE_MANA_REGEN: i32 = 1;
/// Effective intelligence per extra point of mana regen
pub const MANA_REGEN_INT_DIVISOR: i32 = 3;

/// Narrated events kept in the rolling message log
pub const MESSAGE_LOG_CAPACITY: usize = 50;

// ============================================================================
// META PROGRESSION
// ============================================================================

/// Base essence cost of the start-hp upgrade
pub const UPGRADE_HP_BASE_COST: u32 = 50;
/// Base essence cost of the attribute upgrades
pub const UPGRADE_STAT_BASE_COST: u32 = 100;
/// Extra cost per level already bought
pub const UPGRADE_COST_PER_LEVEL: u32 = 50;
