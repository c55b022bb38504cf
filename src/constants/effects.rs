//! Status effect parameters.

/// Burn damage per tick when an effect carries no magnitude
pub const BURN_DEFAULT_DAMAGE: i32 = 1;
